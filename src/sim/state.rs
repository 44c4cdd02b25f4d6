//! Entity state and shared simulation context
//!
//! Actors (player, enemies, prize) are never removed: "destroyed" means
//! respawned. Projectiles are transient and owned by the arena's list.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effect::TimedEffect;
use super::geometry::{Point2D, is_in_rect};
use super::guidance::{Guidance, GuidanceMode};
use crate::consts::*;
use crate::options::ArenaOptions;
use crate::{heading_vector, normalize_heading};

/// Stable actor handle (also the iteration order)
pub type ActorId = u32;

/// Movement state shared by every moving thing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Degrees, [0, 360)
    pub heading: f32,
    /// Units per tick; negative moves backwards
    pub speed: f32,
    /// Collision radius. May be negative to shrink contact range.
    pub size: f32,
}

impl Body {
    pub fn new(spawn: Point2D, speed: f32, size: f32) -> Self {
        Self {
            pos: spawn.pos(),
            heading: normalize_heading(spawn.heading),
            speed,
            size,
        }
    }

    #[inline]
    pub fn point(&self) -> Point2D {
        Point2D::new(self.pos.x, self.pos.y, self.heading)
    }

    /// Move forward along the heading by one tick of speed
    pub fn advance(&mut self) {
        self.pos += heading_vector(self.heading) * self.speed;
    }

    /// Rotate counter-clockwise by `degrees`
    pub fn turn(&mut self, degrees: f32) {
        self.heading = normalize_heading(self.heading + degrees);
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_heading(heading);
    }

    pub fn place(&mut self, at: Point2D) {
        self.pos = at.pos();
        self.set_heading(at.heading);
    }
}

/// Forward/reverse/turn limits (reverse is normally <= 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub max_fwd_speed: f32,
    pub max_rev_speed: f32,
    pub max_turn_speed: f32,
}

impl SpeedLimits {
    pub const PLAYER: Self = Self {
        max_fwd_speed: PLAYER_MAX_FWD_SPEED,
        max_rev_speed: PLAYER_MAX_REV_SPEED,
        max_turn_speed: PLAYER_MAX_TURN,
    };
    pub const ENEMY: Self = Self {
        max_fwd_speed: ENEMY_MAX_FWD_SPEED,
        max_rev_speed: ENEMY_MAX_REV_SPEED,
        max_turn_speed: ENEMY_MAX_TURN,
    };
    pub const STATIONARY: Self = Self {
        max_fwd_speed: 0.0,
        max_rev_speed: 0.0,
        max_turn_speed: 0.0,
    };

    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.max_rev_speed, self.max_fwd_speed)
    }
}

/// Player-only state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub lives: u32,
    pub bombs: u32,
    pub invulnerable: TimedEffect,
    pub cant_fire: TimedEffect,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            lives: PLAYER_LIVES,
            bombs: PLAYER_BOMBS,
            invulnerable: TimedEffect::inactive(),
            cant_fire: TimedEffect::inactive(),
        }
    }
}

/// Enemy-only state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub guidance: Guidance,
    /// Guidance mode to return to when scatter ends
    pub home_mode: GuidanceMode,
    /// Actor this enemy steers against (itself until assigned)
    pub target: ActorId,
    pub scattered: TimedEffect,
    /// Speed to restore when scatter ends
    pub pre_scatter_speed: f32,
    pub cant_fire: TimedEffect,
}

impl EnemyState {
    pub fn new(id: ActorId, mode: GuidanceMode, aim: Vec2) -> Self {
        Self {
            guidance: Guidance::new(mode, aim),
            home_mode: mode,
            target: id,
            scattered: TimedEffect::inactive(),
            pre_scatter_speed: 0.0,
            cant_fire: TimedEffect::inactive(),
        }
    }

    pub fn is_scattered(&self, now: f64) -> bool {
        self.scattered.is_active(now)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrizeState {
    /// Prize jumps elsewhere when this runs out
    pub relocate: TimedEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActorKind {
    Player(PlayerState),
    Enemy(EnemyState),
    Prize(PrizeState),
}

/// Kind tag used by the wall resolver and renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    Enemy,
    Prize,
    Projectile,
}

impl BodyKind {
    #[inline]
    pub fn is_actor(self) -> bool {
        self != BodyKind::Projectile
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub body: Body,
    pub limits: SpeedLimits,
    /// Where the player returns on respawn
    pub spawn: Point2D,
    pub flashing: TimedEffect,
    pub kind: ActorKind,
}

impl Actor {
    pub fn player(id: ActorId, spawn: Point2D) -> Self {
        Self {
            id,
            body: Body::new(spawn, PLAYER_START_SPEED, ACTOR_SIZE),
            limits: SpeedLimits::PLAYER,
            spawn,
            flashing: TimedEffect::inactive(),
            kind: ActorKind::Player(PlayerState::default()),
        }
    }

    pub fn enemy(id: ActorId, spawn: Point2D, speed: f32, mode: GuidanceMode) -> Self {
        let limits = SpeedLimits::ENEMY;
        Self {
            id,
            body: Body::new(spawn, limits.clamp_speed(speed), ACTOR_SIZE),
            limits,
            spawn,
            flashing: TimedEffect::inactive(),
            kind: ActorKind::Enemy(EnemyState::new(id, mode, spawn.pos())),
        }
    }

    pub fn prize(id: ActorId, spawn: Point2D) -> Self {
        Self {
            id,
            body: Body::new(spawn, 0.0, ACTOR_SIZE),
            limits: SpeedLimits::STATIONARY,
            spawn,
            flashing: TimedEffect::inactive(),
            kind: ActorKind::Prize(PrizeState::default()),
        }
    }

    pub fn body_kind(&self) -> BodyKind {
        match self.kind {
            ActorKind::Player(_) => BodyKind::Player,
            ActorKind::Enemy(_) => BodyKind::Enemy,
            ActorKind::Prize(_) => BodyKind::Prize,
        }
    }

    /// Set speed, clamped into the actor's limits
    pub fn set_speed(&mut self, speed: f32) {
        self.body.speed = self.limits.clamp_speed(speed);
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            ActorKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            ActorKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyState> {
        match &self.kind {
            ActorKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.kind {
            ActorKind::Enemy(e) => Some(e),
            _ => None,
        }
    }
}

/// Who fired a projectile (attribution only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy(ActorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// `bouncy` marks shots fired with a bounce budget
    Bullet { bouncy: bool },
    /// Decays speed each tick and bursts into `fragments` bullets
    Bomb { fragments: u32, speed_decay: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    /// Remaining wall bounces; expires once negative
    pub bounces: i32,
    pub owner: Owner,
    pub spawned_at: f64,
    /// Seconds
    pub lifetime: f32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn bullet(id: u32, at: Point2D, speed: f32, bounces: i32, owner: Owner, now: f64) -> Self {
        Self {
            id,
            body: Body::new(at, speed, BULLET_SIZE),
            bounces,
            owner,
            spawned_at: now,
            lifetime: BULLET_LIFETIME,
            kind: ProjectileKind::Bullet {
                bouncy: bounces > 0,
            },
        }
    }

    pub fn bomb(id: u32, at: Point2D, speed: f32, owner: Owner, now: f64) -> Self {
        Self {
            id,
            body: Body::new(at, speed, BOMB_SIZE),
            bounces: 0,
            owner,
            spawned_at: now,
            lifetime: BOMB_LIFETIME,
            kind: ProjectileKind::Bomb {
                fragments: BOMB_FRAGMENTS,
                speed_decay: BOMB_SPEED_DECAY,
            },
        }
    }

    /// Per-tick motion (bombs slow down first)
    pub fn advance(&mut self) {
        if let ProjectileKind::Bomb { speed_decay, .. } = self.kind {
            self.body.speed *= speed_decay;
        }
        self.body.advance();
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawned_at
    }

    /// Out of bounces or past its lifetime
    pub fn is_spent(&self, now: f64) -> bool {
        self.bounces < 0 || self.age(now) > self.lifetime as f64
    }
}

/// Arena half-extents; the playable area is (-x, x) × (-y, y)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Strictly inside the arena
    pub fn contains(&self, pos: Vec2) -> bool {
        is_in_rect(pos, Vec2::new(-self.x, self.y), Vec2::new(self.x, -self.y))
    }

    /// Clamp into the arena shrunk by `margin` on every side
    pub fn clamp(&self, pos: Vec2, margin: f32) -> Vec2 {
        let hx = (self.x - margin).max(0.0);
        let hy = (self.y - margin).max(0.0);
        Vec2::new(pos.x.clamp(-hx, hx), pos.y.clamp(-hy, hy))
    }

    /// Uniform random point inside the arena shrunk by `margin`
    pub fn random_point(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        let hx = (self.x - margin).max(0.0);
        let hy = (self.y - margin).max(0.0);
        Vec2::new(rng.random_range(-hx..=hx), rng.random_range(-hy..=hy))
    }

    #[inline]
    pub fn height(&self) -> f32 {
        2.0 * self.y
    }
}

/// Read-only view of the arena passed into guidance, collision and bounce code
#[derive(Debug, Clone, Copy)]
pub struct ArenaContext<'a> {
    pub bounds: Bounds,
    pub options: &'a ArenaOptions,
    /// Simulation clock (seconds)
    pub now: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_advance() {
        let mut body = Body::new(Point2D::new(0.0, 0.0, 90.0), 5.0, 10.0);
        body.advance();
        assert!(body.pos.x.abs() < 1e-5);
        assert!((body.pos.y - 5.0).abs() < 1e-5);

        body.speed = -2.0;
        body.advance();
        assert!((body.pos.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_actor_speed_clamped() {
        let mut player = Actor::player(1, Point2D::new(0.0, 0.0, 0.0));
        player.set_speed(100.0);
        assert_eq!(player.body.speed, PLAYER_MAX_FWD_SPEED);
        player.set_speed(-100.0);
        assert_eq!(player.body.speed, PLAYER_MAX_REV_SPEED);

        let enemy = Actor::enemy(2, Point2D::default(), 50.0, GuidanceMode::Pursuit);
        assert_eq!(enemy.body.speed, ENEMY_MAX_FWD_SPEED);
    }

    #[test]
    fn test_enemy_targets_itself_by_default() {
        let enemy = Actor::enemy(7, Point2D::default(), 2.0, GuidanceMode::Patrol);
        assert_eq!(enemy.as_enemy().map(|e| e.target), Some(7));
    }

    #[test]
    fn test_bomb_decays() {
        let mut bomb = Projectile::bomb(1, Point2D::default(), 30.0, Owner::Player, 0.0);
        bomb.advance();
        assert!((bomb.body.speed - 27.0).abs() < 1e-4);
        assert!((bomb.body.pos.x - 27.0).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_spent() {
        let mut bullet = Projectile::bullet(1, Point2D::default(), 30.0, 0, Owner::Player, 0.0);
        assert!(!bullet.is_spent(1.0));
        assert!(bullet.is_spent(BULLET_LIFETIME as f64 + 0.1));
        bullet.bounces = -1;
        assert!(bullet.is_spent(1.0));
    }

    #[test]
    fn test_bounds() {
        let b = Bounds::new(100.0, 50.0);
        assert!(b.contains(Vec2::new(99.0, 49.0)));
        assert!(!b.contains(Vec2::new(100.0, 0.0)));
        assert_eq!(b.clamp(Vec2::new(500.0, -500.0), 10.0), Vec2::new(90.0, -40.0));
    }
}
