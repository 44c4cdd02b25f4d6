//! Walls and the bounce-mode response table
//!
//! | Mode        | Actors                    | Projectiles               |
//! |-------------|---------------------------|---------------------------|
//! | Standard    | reflect                   | reflect                   |
//! | Slow        | reflect, player speed / 2 | reflect                   |
//! | SemiRandom  | reflect + random jitter   | reflect + random jitter   |
//! | ActorsPass  | pass                      | reflect                   |
//! | BulletsPass | reflect                   | pass                      |
//! | Warp        | teleport across center    | teleport across center    |
//! | Lethal      | reflect + lethal          | reflect + lethal          |
//!
//! Life, respawn and bounce-counter side effects of `Lethal` and `Reflected`
//! are applied by the tick controller from the returned [`WallResponse`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::wall_contact_radius;
use super::geometry::{Point2D, bearing, segment_distance};
use super::state::{ArenaContext, Body, BodyKind};
use crate::consts::SEMI_RANDOM_MAX_DEFLECTION;
use crate::{heading_vector, normalize_heading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BounceMode {
    #[default]
    Standard,
    Slow,
    SemiRandom,
    ActorsPass,
    BulletsPass,
    Warp,
    Lethal,
}

/// What a wall did to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Body went through untouched
    Passed,
    /// Heading reflected (costs a projectile one bounce)
    Reflected,
    /// Body teleported, heading kept
    Warped,
    /// Reflected off a hot wall
    Lethal,
}

/// Immutable line-segment wall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub p1: Vec2,
    pub p2: Vec2,
    /// Bearing from p1 to p2 (degrees)
    pub angle: f32,
    pub bounce_mode: BounceMode,
}

impl Wall {
    pub fn new(p1: Vec2, p2: Vec2, bounce_mode: BounceMode) -> Self {
        Self {
            p1,
            p2,
            angle: bearing(&Point2D::at(p1), &Point2D::at(p2)),
            bounce_mode,
        }
    }

    pub fn length(&self) -> f32 {
        self.p1.distance(self.p2)
    }

    /// Apply this wall's response to a body already known to be in contact
    pub fn resolve(
        &self,
        body: &mut Body,
        kind: BodyKind,
        ctx: &ArenaContext,
        rng: &mut impl Rng,
    ) -> WallResponse {
        match self.bounce_mode {
            BounceMode::Standard => {
                self.reflect(body);
                WallResponse::Reflected
            }
            BounceMode::Slow => {
                self.reflect(body);
                if kind == BodyKind::Player {
                    body.speed *= 0.5;
                }
                WallResponse::Reflected
            }
            BounceMode::SemiRandom => {
                self.reflect(body);
                let spread = (body.heading - self.angle)
                    .abs()
                    .trunc()
                    .min(SEMI_RANDOM_MAX_DEFLECTION) as i32;
                let jitter = rng.random_range(-spread..=spread);
                body.turn(jitter as f32);
                WallResponse::Reflected
            }
            BounceMode::ActorsPass => {
                if kind.is_actor() {
                    WallResponse::Passed
                } else {
                    self.reflect(body);
                    WallResponse::Reflected
                }
            }
            BounceMode::BulletsPass => {
                if kind.is_actor() {
                    self.reflect(body);
                    WallResponse::Reflected
                } else {
                    WallResponse::Passed
                }
            }
            BounceMode::Warp => {
                body.pos = self.warp_target(body, ctx);
                WallResponse::Warped
            }
            BounceMode::Lethal => {
                self.reflect(body);
                WallResponse::Lethal
            }
        }
    }

    /// Standard reflection: 2·wall − approach
    pub fn reflect(&self, body: &mut Body) {
        body.heading = reflect_heading(body.heading, self.angle);
    }

    /// Mirror of the body across the line through the arena center parallel
    /// to this wall, pulled in by its wall contact radius so it does not land
    /// on the opposite wall. Prefers the in-bounds candidate, else the one nearer
    /// the center.
    fn warp_target(&self, body: &Body, ctx: &ArenaContext) -> Vec2 {
        let dir = self.p2 - self.p1;
        let wall_offset = segment_distance(Vec2::ZERO, self.p1, self.p2);
        // Pull in by the full contact radius so the landing spot clears the
        // opposite wall
        let reach = wall_contact_radius(body, self.bounce_mode);
        let mut offset = segment_distance(body.pos, Vec2::ZERO, dir);
        if offset > wall_offset {
            offset += reach;
        } else {
            offset -= reach;
        }

        let a = body.pos + heading_vector(self.angle + 90.0) * offset * 2.0;
        let b = body.pos + heading_vector(self.angle - 90.0) * offset * 2.0;
        match (ctx.bounds.contains(a), ctx.bounds.contains(b)) {
            (true, false) => a,
            (false, true) => b,
            _ if a.length_squared() < b.length_squared() => a,
            _ => b,
        }
    }
}

/// Reflect a heading about a wall angle, normalized to [0, 360)
#[inline]
pub fn reflect_heading(heading: f32, wall_angle: f32) -> f32 {
    normalize_heading(2.0 * wall_angle - heading)
}
