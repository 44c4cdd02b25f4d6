//! Space War - guidance, collision and wall-interaction engine for a 2D arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (guidance, autopilot, collisions, wall bounces, tick)
//! - `options`: Arena construction options (JSON-loadable)
//! - `score`: Score and high-score bookkeeping
//! - `render`: Renderable records handed to an external drawing backend
//! - `error`: Configuration error types

pub mod error;
pub mod options;
pub mod render;
pub mod score;
pub mod sim;

pub use error::{ConfigError, ConfigResult};
pub use options::ArenaOptions;
pub use render::{InstanceData, Renderable, Shape};
pub use score::{ScoreBoard, ScoreSnapshot};
pub use sim::{Arena, PlayerCommand};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed step used by the headless driver (30 Hz, the prototype frame rate)
    pub const SIM_DT: f32 = 1.0 / 30.0;

    /// Arena half-extents
    pub const BORDER_X: f32 = 800.0;
    pub const BORDER_Y: f32 = 450.0;

    /// Default collision radius for actors
    pub const ACTOR_SIZE: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SPAWN: (f32, f32, f32) = (0.0, -250.0, 90.0);
    pub const PLAYER_START_SPEED: f32 = 4.0;
    pub const PLAYER_MAX_FWD_SPEED: f32 = 15.0;
    pub const PLAYER_MAX_REV_SPEED: f32 = -5.0;
    pub const PLAYER_MAX_TURN: f32 = 22.5;
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_BOMBS: u32 = 3;
    /// Shots per second
    pub const PLAYER_RATE_OF_FIRE: f32 = 4.0;

    /// Enemy defaults
    pub const ENEMY_MAX_FWD_SPEED: f32 = 8.0;
    pub const ENEMY_MAX_REV_SPEED: f32 = 0.0;
    pub const ENEMY_MAX_TURN: f32 = 10.0;
    pub const ENEMY_RATE_OF_FIRE: f32 = 0.5;
    /// Enemies fire when the target is within this many degrees of the nose
    pub const ENEMY_FIRE_CONE: f32 = 3.0;
    /// Enemies switch to bounce shots inside this many multiples of their size
    pub const ENEMY_CLOSE_RANGE_SIZES: f32 = 6.0;

    /// Projectile defaults
    pub const BULLET_SPEED: f32 = 30.0;
    pub const BULLET_SIZE: f32 = 2.0;
    pub const BULLET_LIFETIME: f32 = 30.0;
    pub const BOUNCE_SHOT_BOUNCES: i32 = 20;
    pub const BOMB_SIZE: f32 = 10.0;
    pub const BOMB_LIFETIME: f32 = 5.0;
    pub const BOMB_SPEED_DECAY: f32 = 0.9;
    pub const BOMB_FRAGMENTS: u32 = 20;

    /// Status durations (seconds)
    pub const INVULN_SECS: f32 = 3.0;
    pub const SCATTER_SECS: f32 = 3.0;
    pub const PRIZE_RELOCATE_SECS: f32 = 10.0;
    /// Flash period while invulnerable (seconds)
    pub const FLASH_INTERVAL: f32 = 0.2;

    /// Autopilot proportional gain
    pub const AUTOPILOT_GAIN: f32 = 0.5;
    /// Ticks between random-guidance aim point resamples
    pub const RANDOM_RESAMPLE_TICKS: u32 = 50;

    /// Effective wall radius multiplier for Slow walls (prevents sticking)
    pub const SLOW_WALL_STICK_FACTOR: f32 = 1.5;
    /// Largest random deflection off a SemiRandom wall (degrees)
    pub const SEMI_RANDOM_MAX_DEFLECTION: f32 = 60.0;

    /// Scoring
    pub const DIRECT_HIT_SCORE: u64 = 100;
    pub const RICOCHET_HIT_SCORE: u64 = 10;
    pub const SCATTERED_RAM_SCORE: u64 = 200;
    pub const BONUS_BOMB_EVERY: u64 = 1000;

    /// Respawn placement attempts before falling back
    pub const RESPAWN_ATTEMPTS: u32 = 100;
}

/// Normalize a heading to [0, 360) degrees
#[inline]
pub fn normalize_heading(heading: f32) -> f32 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Unit vector for a heading in degrees (0 = +x, CCW positive)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    let rad = heading.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
