//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Movement measured per tick; `dt` only drives the clock
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod effect;
pub mod geometry;
pub mod guidance;
pub mod state;
pub mod tick;
pub mod wall;

pub use arena::{Arena, PlayerCommand, Shot, default_walls, spawn_point};
pub use collision::{circles_overlap, hits_wall, wall_contact_radius};
pub use effect::TimedEffect;
pub use geometry::{Point2D, bearing, distance, is_in_rect, relative_bearing, segment_distance};
pub use guidance::{Guidance, GuidanceMode, intercept_distance, intercept_point};
pub use state::{
    Actor, ActorId, ActorKind, ArenaContext, Body, BodyKind, Bounds, EnemyState, Owner,
    PlayerState, PrizeState, Projectile, ProjectileKind, SpeedLimits,
};
pub use tick::{TickInput, tick};
pub use wall::{BounceMode, Wall, WallResponse, reflect_heading};
