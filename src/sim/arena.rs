//! The arena: owns every actor, projectile and wall
//!
//! Outside collaborators drive it through four entry points: `tick` (see
//! `tick.rs`), `apply_player_command`, `get_score_snapshot` and
//! `get_renderables`.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::Point2D;
use super::guidance::GuidanceMode;
use super::state::{Actor, ActorId, ActorKind, Bounds, Owner, Projectile, ProjectileKind};
use super::wall::{BounceMode, Wall};
use crate::consts::*;
use crate::options::ArenaOptions;
use crate::render::{Renderable, Shape, colors};
use crate::score::{ScoreBoard, ScoreSnapshot};

/// The player is always the first actor
pub(crate) const PLAYER_INDEX: usize = 0;

/// Input from the keyboard layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    TurnLeft,
    TurnRight,
    Accelerate,
    Decelerate,
    FireBullet,
    FireBounce,
    FireBomb,
    Respawn,
}

/// Weapon selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shot {
    Bullet,
    Bounce,
    Bomb,
}

pub struct Arena {
    pub options: ArenaOptions,
    pub bounds: Bounds,
    /// Sorted by id; player first
    pub actors: Vec<Actor>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    pub walls: Vec<Wall>,
    pub score: ScoreBoard,
    /// Simulation clock (seconds)
    pub time: f64,
    pub tick_count: u64,
    pub(crate) rng: Pcg32,
    running: bool,
    next_id: u32,
}

impl Arena {
    /// Build the default layout: border walls, interior walls, player, prize
    /// and `num_enemies` enemies
    pub fn new(options: ArenaOptions) -> Self {
        let bounds = Bounds::new(options.border_x, options.border_y);
        let mut arena = Self {
            bounds,
            actors: Vec::new(),
            projectiles: Vec::new(),
            walls: Vec::new(),
            score: ScoreBoard::new(),
            time: 0.0,
            tick_count: 0,
            rng: Pcg32::seed_from_u64(options.seed),
            running: true,
            next_id: 1,
            options,
        };

        arena.walls = default_walls(bounds, arena.options.all_walls_bounce_mode);

        let (sx, sy, sh) = PLAYER_SPAWN;
        let player_id = arena.next_entity_id();
        arena.actors.push(Actor::player(player_id, Point2D::new(sx, sy, sh)));

        let player_pos = Vec2::new(sx, sy);
        let prize_id = arena.next_entity_id();
        let at = spawn_point(&bounds, player_pos, ACTOR_SIZE, &mut arena.rng);
        let mut prize = Actor::prize(prize_id, at);
        if let ActorKind::Prize(state) = &mut prize.kind {
            state.relocate.start(arena.time, PRIZE_RELOCATE_SECS);
        }
        arena.actors.push(prize);

        for i in 0..arena.options.num_enemies {
            let id = arena.next_entity_id();
            let at = spawn_point(&bounds, player_pos, ACTOR_SIZE, &mut arena.rng);
            let speed = (2.0 + i as f32 / 2.0).min(5.0);
            let mode = arena.options.guidance_for_enemy(i);
            arena.actors.push(Actor::enemy(id, at, speed, mode));
        }
        arena.assign_targets();

        log::info!(
            "Arena {}x{} ready: {} enemies, {} walls, seed {}",
            bounds.x * 2.0,
            bounds.y * 2.0,
            arena.options.num_enemies,
            arena.walls.len(),
            arena.options.seed
        );
        arena
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Actor {
        &self.actors[PLAYER_INDEX]
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.actors[PLAYER_INDEX]
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.actors[i])
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.as_enemy().is_some())
    }

    /// Point every enemy at the player, or at a random other actor
    fn assign_targets(&mut self) {
        let player_id = self.player().id;
        let ids: Vec<ActorId> = self.actors.iter().map(|a| a.id).collect();
        let random = self.options.all_enemies_aim_at_random_target;

        for actor in &mut self.actors {
            let own = actor.id;
            let Some(enemy) = actor.as_enemy_mut() else {
                continue;
            };
            enemy.target = if random {
                let others: Vec<ActorId> = ids.iter().copied().filter(|&id| id != own).collect();
                others.choose(&mut self.rng).copied().unwrap_or(player_id)
            } else {
                player_id
            };
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop accepting ticks
    pub fn quit(&mut self) {
        self.running = false;
        log::info!("Arena stopped after {} ticks", self.tick_count);
    }

    pub fn toggle_enemy_movement(&mut self) {
        self.options.enemies_can_move = !self.options.enemies_can_move;
        log::debug!("Enemy movement: {}", self.options.enemies_can_move);
    }

    /// Apply one keyboard command to the player
    pub fn apply_player_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::TurnLeft => {
                let player = self.player_mut();
                let turn = player.limits.max_turn_speed;
                player.body.turn(turn);
            }
            PlayerCommand::TurnRight => {
                let player = self.player_mut();
                let turn = player.limits.max_turn_speed;
                player.body.turn(-turn);
            }
            PlayerCommand::Accelerate => {
                let player = self.player_mut();
                player.set_speed(player.body.speed + 1.0);
            }
            PlayerCommand::Decelerate => {
                let player = self.player_mut();
                player.set_speed(player.body.speed - 1.0);
            }
            PlayerCommand::FireBullet => {
                self.fire(PLAYER_INDEX, Shot::Bullet);
            }
            PlayerCommand::FireBounce => {
                self.fire(PLAYER_INDEX, Shot::Bounce);
            }
            PlayerCommand::FireBomb => {
                self.fire(PLAYER_INDEX, Shot::Bomb);
            }
            PlayerCommand::Respawn => self.respawn_actor(PLAYER_INDEX),
        }
    }

    /// Fire from the actor at `index`, honoring its rate of fire. Only the
    /// player carries bombs. Returns true if a projectile was launched.
    pub fn fire(&mut self, index: usize, shot: Shot) -> bool {
        let now = self.time;
        let Some(actor) = self.actors.get_mut(index) else {
            return false;
        };
        let origin = actor.body.point();
        let speed = actor.body.speed;
        let owner = match &mut actor.kind {
            ActorKind::Player(player) => {
                if player.cant_fire.is_active(now) {
                    return false;
                }
                if shot == Shot::Bomb {
                    if player.bombs == 0 {
                        return false;
                    }
                    player.bombs -= 1;
                }
                player.cant_fire.start(now, 1.0 / PLAYER_RATE_OF_FIRE.max(1e-6));
                Owner::Player
            }
            ActorKind::Enemy(enemy) => {
                if shot == Shot::Bomb || enemy.cant_fire.is_active(now) {
                    return false;
                }
                enemy.cant_fire.start(now, 1.0 / ENEMY_RATE_OF_FIRE.max(1e-6));
                Owner::Enemy(actor.id)
            }
            ActorKind::Prize(_) => return false,
        };

        let id = self.next_entity_id();
        let projectile = match shot {
            Shot::Bullet => Projectile::bullet(id, origin, speed + BULLET_SPEED, 0, owner, now),
            Shot::Bounce => Projectile::bullet(
                id,
                origin,
                speed + BULLET_SPEED / 2.0,
                BOUNCE_SHOT_BOUNCES,
                owner,
                now,
            ),
            Shot::Bomb => Projectile::bomb(id, origin, BULLET_SPEED, owner, now),
        };
        self.projectiles.push(projectile);
        true
    }

    /// Player returns to its spawn point; everything else jumps to a random
    /// point away from the player
    pub fn respawn_actor(&mut self, index: usize) {
        let player_pos = self.player().body.pos;
        let bounds = self.bounds;
        let now = self.time;
        let Some(actor) = self.actors.get_mut(index) else {
            return;
        };
        match &mut actor.kind {
            ActorKind::Player(_) => {
                let spawn = actor.spawn;
                actor.body.place(spawn);
            }
            ActorKind::Prize(prize) => {
                prize.relocate.start(now, PRIZE_RELOCATE_SECS);
                let at = spawn_point(&bounds, player_pos, actor.body.size, &mut self.rng);
                actor.body.place(at);
            }
            ActorKind::Enemy(_) => {
                let at = spawn_point(&bounds, player_pos, actor.body.size, &mut self.rng);
                actor.body.place(at);
            }
        }
        log::debug!("Actor {} respawned at {:?}", actor.id, actor.body.pos);
    }

    /// Start (or extend) scatter on every enemy
    pub fn scatter_enemies(&mut self, seconds: f32) {
        let now = self.time;
        for actor in &mut self.actors {
            let speed = actor.body.speed;
            let Some(enemy) = actor.as_enemy_mut() else {
                continue;
            };
            let already = enemy.scattered.active;
            enemy.scattered.start(now, seconds);
            if !already {
                enemy.home_mode = enemy.guidance.mode;
                enemy.pre_scatter_speed = speed;
                enemy.guidance.set_mode(GuidanceMode::Scatter);
                actor.set_speed(speed * 0.5);
            }
        }
        log::debug!("Enemies scattered for {}s", seconds);
    }

    /// Fresh game: lives, bombs and score restored, actors respawned,
    /// projectiles cleared. High score survives.
    pub fn reset(&mut self) {
        self.score.reset();
        self.projectiles.clear();
        for actor in &mut self.actors {
            let mut restore_speed = None;
            match &mut actor.kind {
                ActorKind::Player(player) => *player = Default::default(),
                ActorKind::Enemy(enemy) => {
                    if enemy.scattered.active {
                        enemy.scattered.clear();
                        enemy.guidance.set_mode(enemy.home_mode);
                        restore_speed = Some(enemy.pre_scatter_speed);
                    }
                }
                ActorKind::Prize(_) => {}
            }
            if let Some(speed) = restore_speed {
                actor.set_speed(speed);
            }
            actor.flashing.clear();
        }
        for index in 0..self.actors.len() {
            self.respawn_actor(index);
        }
        log::info!("Game reset (high score {})", self.score.high_score);
    }

    pub fn get_score_snapshot(&self) -> ScoreSnapshot {
        let (lives, bombs) = self
            .player()
            .as_player()
            .map(|p| (p.lives, p.bombs))
            .unwrap_or_default();
        ScoreSnapshot {
            score: self.score.score,
            high_score: self.score.high_score,
            lives,
            bombs,
        }
    }

    /// Everything a drawing backend needs for this frame
    pub fn get_renderables(&self) -> Vec<Renderable> {
        let now = self.time;
        let mut out = Vec::with_capacity(self.walls.len() + self.actors.len() * 2 + self.projectiles.len());

        for wall in &self.walls {
            out.push(Renderable {
                position: wall.p1,
                heading: wall.angle,
                shape: Shape::Segment {
                    length: wall.length(),
                },
                size: 0.0,
                color: colors::wall(wall.bounce_mode),
            });
        }

        for actor in &self.actors {
            let (shape, mut color) = match &actor.kind {
                ActorKind::Player(_) => (Shape::Triangle, colors::PLAYER),
                ActorKind::Enemy(enemy) => (Shape::Square, colors::enemy(enemy.guidance.mode)),
                ActorKind::Prize(_) => (Shape::Circle, colors::PRIZE),
            };
            if actor.flashing.is_active(now) {
                let phase = actor.flashing.elapsed(now) % FLASH_INTERVAL as f64;
                if phase > FLASH_INTERVAL as f64 / 2.0 {
                    color = colors::BLANK;
                }
            }
            out.push(Renderable {
                position: actor.body.pos,
                heading: actor.body.heading,
                shape,
                size: actor.body.size,
                color,
            });

            if !self.options.show_aim_points {
                continue;
            }
            if let Some(enemy) = actor.as_enemy().filter(|e| e.guidance.mode.maneuvers()) {
                out.push(Renderable {
                    position: enemy.guidance.aim,
                    heading: 0.0,
                    shape: Shape::Dot,
                    size: 2.0,
                    color: colors::AIM_POINT,
                });
            }
        }

        for p in &self.projectiles {
            let (shape, color) = match p.kind {
                ProjectileKind::Bullet { bouncy: false } => (Shape::Triangle, colors::BULLET),
                ProjectileKind::Bullet { bouncy: true } => (Shape::Circle, colors::BOUNCE_SHOT),
                ProjectileKind::Bomb { .. } => (Shape::Circle, colors::BOMB),
            };
            out.push(Renderable {
                position: p.body.pos,
                heading: p.body.heading,
                shape,
                size: p.body.size,
                color,
            });
        }

        out
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.actors.sort_by_key(|a| a.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}

/// Border walls plus the interior layout
pub fn default_walls(bounds: Bounds, forced: Option<BounceMode>) -> Vec<Wall> {
    let (bx, by) = (bounds.x, bounds.y);
    let v = Vec2::new;
    let layout = [
        // Border
        (v(-bx, -by), v(-bx, by), BounceMode::Warp),
        (v(-bx, by), v(bx, by), BounceMode::SemiRandom),
        (v(bx, by), v(bx, -by), BounceMode::Warp),
        (v(bx, -by), v(-bx, -by), BounceMode::Slow),
        // Interior
        (v(-bx / 2.0, -by / 2.0), v(-bx / 2.0, by / 2.0), BounceMode::Lethal),
        (v(bx / 2.0, -by / 2.0), v(bx / 2.0, by / 2.0), BounceMode::BulletsPass),
        (v(-bx / 3.0, by / 2.0), v(bx / 3.0, by / 2.0), BounceMode::ActorsPass),
        (v(-bx / 3.0, -by / 2.0), v(bx / 3.0, -by / 2.0), BounceMode::ActorsPass),
    ];
    layout
        .into_iter()
        .map(|(p1, p2, mode)| Wall::new(p1, p2, forced.unwrap_or(mode)))
        .collect()
}

/// Random placement at least a quarter of the arena height from `avoid`,
/// with a random heading
pub fn spawn_point(bounds: &Bounds, avoid: Vec2, margin: f32, rng: &mut impl Rng) -> Point2D {
    let min_gap = bounds.height() / 4.0;
    for _ in 0..RESPAWN_ATTEMPTS {
        let pos = bounds.random_point(rng, margin);
        if pos.distance(avoid) > min_gap {
            return Point2D::new(pos.x, pos.y, rng.random_range(0.0..360.0));
        }
    }
    let pos = bounds.clamp(-avoid, margin);
    log::warn!("No clear spawn point after {} tries, mirroring to {:?}", RESPAWN_ATTEMPTS, pos);
    Point2D::new(pos.x, pos.y, rng.random_range(0.0..360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_layout() {
        let arena = Arena::new(ArenaOptions::default());
        assert_eq!(arena.walls.len(), 8);
        assert_eq!(arena.actors.len(), 8);
        assert!(arena.player().as_player().is_some());
        assert_eq!(arena.enemies().count(), 6);

        let modes: Vec<GuidanceMode> = arena
            .enemies()
            .filter_map(|e| e.as_enemy().map(|s| s.guidance.mode))
            .collect();
        assert_eq!(modes, GuidanceMode::ALL.to_vec());
    }

    #[test]
    fn test_enemies_target_player() {
        let arena = Arena::new(ArenaOptions::default());
        let player_id = arena.player().id;
        assert!(arena.enemies().all(|e| e.as_enemy().map(|s| s.target) == Some(player_id)));
    }

    #[test]
    fn test_random_targets_exclude_self() {
        let options = ArenaOptions {
            all_enemies_aim_at_random_target: true,
            ..Default::default()
        };
        let arena = Arena::new(options);
        for e in arena.enemies() {
            let target = e.as_enemy().map(|s| s.target);
            assert_ne!(target, Some(e.id));
            assert!(target.and_then(|t| arena.actor(t)).is_some());
        }
    }

    #[test]
    fn test_forced_wall_mode() {
        let options = ArenaOptions {
            all_walls_bounce_mode: Some(BounceMode::Lethal),
            ..Default::default()
        };
        let arena = Arena::new(options);
        assert!(arena.walls.iter().all(|w| w.bounce_mode == BounceMode::Lethal));
    }

    #[test]
    fn test_spawn_points_keep_distance() {
        let arena = Arena::new(ArenaOptions::default());
        let player = arena.player().body.pos;
        for e in arena.enemies() {
            assert!(e.body.pos.distance(player) > arena.bounds.height() / 4.0);
            assert!(arena.bounds.contains(e.body.pos));
        }
    }

    #[test]
    fn test_turn_and_speed_commands() {
        let mut arena = Arena::new(ArenaOptions::default());
        arena.apply_player_command(PlayerCommand::TurnLeft);
        assert!((arena.player().body.heading - 112.5).abs() < 1e-3);
        arena.apply_player_command(PlayerCommand::TurnRight);
        arena.apply_player_command(PlayerCommand::TurnRight);
        assert!((arena.player().body.heading - 67.5).abs() < 1e-3);

        for _ in 0..20 {
            arena.apply_player_command(PlayerCommand::Accelerate);
        }
        assert_eq!(arena.player().body.speed, PLAYER_MAX_FWD_SPEED);
        for _ in 0..40 {
            arena.apply_player_command(PlayerCommand::Decelerate);
        }
        assert_eq!(arena.player().body.speed, PLAYER_MAX_REV_SPEED);
    }

    #[test]
    fn test_rate_of_fire() {
        let mut arena = Arena::new(ArenaOptions::default());
        arena.apply_player_command(PlayerCommand::FireBullet);
        arena.apply_player_command(PlayerCommand::FireBullet);
        assert_eq!(arena.projectiles.len(), 1);
        assert_eq!(arena.projectiles[0].body.speed, PLAYER_START_SPEED + BULLET_SPEED);

        arena.time += 0.3;
        arena.apply_player_command(PlayerCommand::FireBounce);
        assert_eq!(arena.projectiles.len(), 2);
        assert_eq!(arena.projectiles[1].bounces, BOUNCE_SHOT_BOUNCES);
    }

    #[test]
    fn test_bombs_are_limited() {
        let mut arena = Arena::new(ArenaOptions::default());
        for _ in 0..5 {
            arena.apply_player_command(PlayerCommand::FireBomb);
            arena.time += 1.0;
        }
        assert_eq!(arena.projectiles.len(), PLAYER_BOMBS as usize);
        assert_eq!(arena.get_score_snapshot().bombs, 0);
    }

    #[test]
    fn test_respawn_command_returns_to_spawn() {
        let mut arena = Arena::new(ArenaOptions::default());
        arena.player_mut().body.pos = Vec2::new(300.0, 300.0);
        arena.apply_player_command(PlayerCommand::Respawn);
        let (sx, sy, _) = PLAYER_SPAWN;
        assert_eq!(arena.player().body.pos, Vec2::new(sx, sy));
    }

    #[test]
    fn test_renderables() {
        let options = ArenaOptions {
            show_aim_points: true,
            ..Default::default()
        };
        let arena = Arena::new(options);
        let r = arena.get_renderables();
        let segments = r.iter().filter(|r| matches!(r.shape, Shape::Segment { .. })).count();
        let dots = r.iter().filter(|r| r.shape == Shape::Dot).count();
        assert_eq!(segments, 8);
        // Every enemy but the patroller shows its aim point
        assert_eq!(dots, 5);
        assert_eq!(r.len(), 8 + 8 + 5);
    }

    #[test]
    fn test_scatter_halves_speed_once() {
        let mut arena = Arena::new(ArenaOptions::default());
        let before: Vec<f32> = arena.enemies().map(|e| e.body.speed).collect();
        arena.scatter_enemies(SCATTER_SECS);
        arena.scatter_enemies(SCATTER_SECS);
        let after: Vec<f32> = arena.enemies().map(|e| e.body.speed).collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((b * 0.5 - a).abs() < 1e-5);
        }
        assert!(
            arena
                .enemies()
                .all(|e| e.as_enemy().map(|s| s.guidance.mode) == Some(GuidanceMode::Scatter))
        );
    }
}
