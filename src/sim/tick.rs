//! Fixed timestep simulation tick
//!
//! Advances the arena one step in a fixed order: timed effects, movement,
//! bounds, walls, actor contacts, projectile hits, projectile expiry.

use super::arena::{Arena, PLAYER_INDEX, PlayerCommand, Shot, spawn_point};
use super::autopilot;
use super::collision::{circles_overlap, hits_wall};
use super::geometry::{Point2D, relative_bearing};
use super::state::{Actor, ActorKind, ArenaContext, BodyKind, Owner, Projectile, ProjectileKind};
use super::wall::WallResponse;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player commands, applied in order before anything moves
    pub commands: Vec<PlayerCommand>,
    pub toggle_enemy_movement: bool,
    pub quit: bool,
}

impl Arena {
    /// Advance one step with no input
    pub fn tick(&mut self, dt: f32) {
        tick(self, &TickInput::default(), dt);
    }
}

/// Advance the arena by one fixed timestep
///
/// `dt` only moves the clock; movement is measured in units per tick.
pub fn tick(arena: &mut Arena, input: &TickInput, dt: f32) {
    if input.quit {
        arena.quit();
    }
    if !arena.is_running() {
        return;
    }
    if input.toggle_enemy_movement {
        arena.toggle_enemy_movement();
    }
    for &cmd in &input.commands {
        arena.apply_player_command(cmd);
    }

    arena.time += dt as f64;
    arena.tick_count += 1;

    // Scatter, invulnerability, rate of fire, prize relocation
    expire_effects(arena);

    // Movement: player, then enemies (guidance -> autopilot -> advance)
    arena.player_mut().body.advance();
    update_enemies(arena);
    for p in &mut arena.projectiles {
        p.advance();
    }

    // Anything that slipped past the border starts over
    respawn_strays(arena);

    // Collisions
    resolve_walls(arena);
    resolve_actor_contacts(arena);
    resolve_projectile_hits(arena);

    // Cleanup: spent projectiles, bomb bursts, out of lives
    expire_projectiles(arena);
    check_game_over(arena);

    arena.normalize_order();
}

fn expire_effects(arena: &mut Arena) {
    let now = arena.time;
    let mut relocate = Vec::new();

    for (index, actor) in arena.actors.iter_mut().enumerate() {
        actor.flashing.expire(now);
        let mut restore_speed = None;
        match &mut actor.kind {
            ActorKind::Player(player) => {
                player.invulnerable.expire(now);
                player.cant_fire.expire(now);
            }
            ActorKind::Enemy(enemy) => {
                enemy.cant_fire.expire(now);
                if enemy.scattered.expire(now) {
                    enemy.guidance.set_mode(enemy.home_mode);
                    restore_speed = Some(enemy.pre_scatter_speed);
                }
            }
            ActorKind::Prize(prize) => {
                if prize.relocate.expire(now) {
                    relocate.push(index);
                }
            }
        }
        if let Some(speed) = restore_speed {
            actor.set_speed(speed);
            log::debug!("Enemy {} back to normal", actor.id);
        }
    }

    for index in relocate {
        arena.respawn_actor(index);
    }
}

/// Guidance, autopilot and movement for every enemy, then enemy fire
fn update_enemies(arena: &mut Arena) {
    let can_move = arena.options.enemies_can_move;
    let can_fire = arena.options.enemies_can_fire;
    let speed_match = arena.options.all_enemies_speed_match;
    let player_speed = arena.player().body.speed.abs();
    let mut shots = Vec::new();

    for index in 0..arena.actors.len() {
        let Some(target_id) = arena.actors[index].as_enemy().map(|e| e.target) else {
            continue;
        };
        let own_id = arena.actors[index].id;
        let target = arena
            .actor(target_id)
            .map(|a| a.body)
            .unwrap_or(arena.actors[index].body);

        if can_move {
            let ctx = ArenaContext {
                bounds: arena.bounds,
                options: &arena.options,
                now: arena.time,
            };
            let actor = &mut arena.actors[index];
            if speed_match {
                actor.set_speed(player_speed);
            }
            let Actor {
                body, limits, kind, ..
            } = actor;
            if let ActorKind::Enemy(enemy) = kind {
                let aim = enemy.guidance.update(&ctx, body, &target, &mut arena.rng);
                if enemy.guidance.mode.maneuvers() {
                    autopilot::steer(body, aim, limits.max_turn_speed);
                }
            }
            body.advance();
        }

        // An enemy aiming at itself has nothing to shoot
        if can_fire && target_id != own_id {
            let own = arena.actors[index].body;
            let off_axis = relative_bearing(&own.point(), &target.point());
            if off_axis.abs() < ENEMY_FIRE_CONE {
                let close = own.pos.distance(target.pos) < own.size * ENEMY_CLOSE_RANGE_SIZES;
                shots.push((index, if close { Shot::Bounce } else { Shot::Bullet }));
            }
        }
    }

    for (index, shot) in shots {
        arena.fire(index, shot);
    }
}

fn respawn_strays(arena: &mut Arena) {
    for index in 0..arena.actors.len() {
        if !arena.bounds.contains(arena.actors[index].body.pos) {
            log::debug!("Actor {} left the arena", arena.actors[index].id);
            arena.respawn_actor(index);
        }
    }
}

/// Wall contacts, walls applied in order and cumulatively
fn resolve_walls(arena: &mut Arena) {
    let Arena {
        actors,
        projectiles,
        walls,
        bounds,
        options,
        time,
        rng,
        ..
    } = arena;
    let ctx = ArenaContext {
        bounds: *bounds,
        options: &*options,
        now: *time,
    };
    let mut player_pos = actors[PLAYER_INDEX].body.pos;

    // Actors: the player comes first, so respawns below see where it ended up
    for actor in actors.iter_mut() {
        let kind = actor.body_kind();
        for wall in walls.iter() {
            if !hits_wall(&actor.body, wall) {
                continue;
            }
            if wall.resolve(&mut actor.body, kind, &ctx, rng) != WallResponse::Lethal {
                continue;
            }
            match kind {
                BodyKind::Player => {
                    hurt_player(actor, ctx.now);
                }
                BodyKind::Enemy => {
                    let at = spawn_point(&ctx.bounds, player_pos, actor.body.size, rng);
                    actor.body.place(at);
                    log::debug!("Enemy {} destroyed by a lethal wall", actor.id);
                }
                BodyKind::Prize | BodyKind::Projectile => {}
            }
        }
        if kind == BodyKind::Player {
            player_pos = actor.body.pos;
        }
    }

    // Projectiles: reflections spend a bounce, lethal walls grant one
    for p in projectiles.iter_mut() {
        for wall in walls.iter() {
            if !hits_wall(&p.body, wall) {
                continue;
            }
            match wall.resolve(&mut p.body, BodyKind::Projectile, &ctx, rng) {
                WallResponse::Reflected => p.bounces -= 1,
                WallResponse::Lethal => p.bounces += 1,
                WallResponse::Passed | WallResponse::Warped => {}
            }
        }
    }
}

/// Player against enemies and the prize
fn resolve_actor_contacts(arena: &mut Arena) {
    let now = arena.time;
    let mut respawns = Vec::new();
    let mut prize = None;
    let mut ram_points = 0;

    let (head, others) = arena.actors.split_at_mut(PLAYER_INDEX + 1);
    let player = &mut head[PLAYER_INDEX];
    for (offset, other) in others.iter().enumerate() {
        if !circles_overlap(&player.body, &other.body) {
            continue;
        }
        let index = PLAYER_INDEX + 1 + offset;
        match &other.kind {
            ActorKind::Enemy(enemy) if enemy.is_scattered(now) => {
                ram_points += SCATTERED_RAM_SCORE;
                respawns.push(index);
            }
            ActorKind::Enemy(_) => {
                if hurt_player(player, now) {
                    respawns.push(index);
                }
            }
            ActorKind::Prize(_) => prize = Some(index),
            ActorKind::Player(_) => {}
        }
    }

    for index in respawns {
        arena.respawn_actor(index);
    }
    award(arena, ram_points);

    if let Some(index) = prize {
        let player = arena.player_mut();
        if let Some(state) = player.as_player_mut() {
            state.lives += 1;
            state.invulnerable.start(now, INVULN_SECS);
        }
        player.flashing.start(now, INVULN_SECS);
        log::debug!("Prize collected");
        arena.scatter_enemies(SCATTER_SECS);
        arena.respawn_actor(index);
    }
}

/// Player shots against enemies, enemy shots against the player
fn resolve_projectile_hits(arena: &mut Arena) {
    let now = arena.time;

    for j in 0..arena.projectiles.len() {
        let shot = &arena.projectiles[j];
        if shot.is_spent(now) {
            continue;
        }
        let (body, bounces, owner) = (shot.body, shot.bounces, shot.owner);

        match owner {
            Owner::Player => {
                let hit = arena
                    .actors
                    .iter()
                    .position(|a| a.as_enemy().is_some() && circles_overlap(&body, &a.body));
                let Some(index) = hit else {
                    continue;
                };
                let scattered = arena.actors[index]
                    .as_enemy()
                    .is_some_and(|e| e.is_scattered(now));
                let mut points = if bounces > 1 {
                    RICOCHET_HIT_SCORE
                } else {
                    DIRECT_HIT_SCORE
                };
                if scattered {
                    points *= 2;
                }
                log::debug!(
                    "Projectile {} hit enemy {}",
                    arena.projectiles[j].id,
                    arena.actors[index].id
                );
                award(arena, points);
                arena.respawn_actor(index);
            }
            Owner::Enemy(_) => {
                if !circles_overlap(&body, &arena.player().body) {
                    continue;
                }
                // Shots pass through an invulnerable player
                if !hurt_player(arena.player_mut(), now) {
                    continue;
                }
            }
        }

        // Spent; bombs burst on expiry
        arena.projectiles[j].bounces = -1;
    }
}

/// Drop spent and escaped projectiles; spent bombs burst into fragments
fn expire_projectiles(arena: &mut Arena) {
    let now = arena.time;
    let bounds = arena.bounds;
    let mut bursts = Vec::new();

    arena.projectiles.retain(|p| {
        let escaped = !bounds.contains(p.body.pos);
        let spent = p.is_spent(now);
        if spent && !escaped {
            if let ProjectileKind::Bomb { fragments, .. } = p.kind {
                bursts.push((p.body.pos, p.owner, fragments));
            }
        }
        !(spent || escaped)
    });

    for (pos, owner, fragments) in bursts {
        log::debug!("Bomb burst at ({:.0}, {:.0}) into {} fragments", pos.x, pos.y, fragments);
        for i in 0..fragments {
            let heading = i as f32 * 360.0 / fragments as f32;
            let id = arena.next_entity_id();
            arena.projectiles.push(Projectile::bullet(
                id,
                Point2D::new(pos.x, pos.y, heading),
                BULLET_SPEED,
                0,
                owner,
                now,
            ));
        }
    }
}

fn check_game_over(arena: &mut Arena) {
    let out_of_lives = arena.player().as_player().is_some_and(|p| p.lives == 0);
    if out_of_lives && arena.options.player_can_die {
        log::info!("Out of lives with {} points", arena.score.score);
        arena.reset();
    }
}

/// Take a life unless invulnerable. Returns true if a life was lost.
fn hurt_player(actor: &mut Actor, now: f64) -> bool {
    let Some(player) = actor.as_player_mut() else {
        return false;
    };
    if player.invulnerable.is_active(now) {
        return false;
    }
    player.lives = player.lives.saturating_sub(1);
    player.invulnerable.start(now, INVULN_SECS);
    let lives = player.lives;
    actor.flashing.start(now, INVULN_SECS);
    log::debug!("Player hit, {} lives left", lives);
    true
}

fn award(arena: &mut Arena, points: u64) {
    if !arena.score.award(points) {
        return;
    }
    if let Some(player) = arena.player_mut().as_player_mut() {
        player.bombs += 1;
    }
    log::info!("Bonus bomb at {} points", arena.score.score);
}
