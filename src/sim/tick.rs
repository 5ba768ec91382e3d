//! Per-frame simulation tick
//!
//! Phases run in a fixed order: rebuild the grid, prune anything that left
//! the world, resolve collisions, let the formation fire, move everything,
//! step the formation, roll for a mystery ship, then report score changes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEffect, resolve};
use super::entity::EntityId;
use super::player::PlayerCannon;
use super::state::{GamePhase, SceneMutation, Session};
use crate::consts::SHOT_SPAWN_OFFSET;
use crate::hud::Hud;

/// Key state sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl TickInput {
    /// -1, 0 or +1 along x
    pub fn movement(&self) -> f32 {
        (i8::from(self.right) - i8::from(self.left)) as f32
    }
}

/// Advance the session by `dt` seconds. Returns the scene mutations made
/// since the previous call. After game over this does nothing.
pub fn tick(
    session: &mut Session,
    input: &TickInput,
    dt: f32,
    hud: &mut dyn Hud,
) -> Vec<SceneMutation> {
    if session.phase == GamePhase::GameOver {
        return session.take_mutations();
    }

    session.time_ticks += 1;
    let score_before = session.score;

    rebuild_grid(session);
    prune_out_of_bounds(session);

    resolve_player_shot(session);
    if resolve_player(session) {
        lose_life(session, hud);
        if session.phase == GamePhase::GameOver {
            report_score(session, score_before, hud);
            return session.take_mutations();
        }
    }

    formation_fire(session);
    update_motion(session, input, dt);

    for step in session.formation.update(dt) {
        log::trace!("Formation step {:?}", step);
    }

    let chance = session.settings.tuning.mystery_spawn_chance;
    if session.rng.random_bool(chance) {
        session.spawn_mystery_ship();
    }

    report_score(session, score_before, hud);
    session.take_mutations()
}

fn rebuild_grid(session: &mut Session) {
    let Session {
        grid,
        player,
        player_shot,
        enemy_shots,
        mystery_ships,
        formation,
        ..
    } = session;

    grid.rebuild(
        player
            .iter()
            .map(|p| &p.body)
            .chain(player_shot.iter())
            .chain(enemy_shots.iter())
            .chain(mystery_ships.iter().map(|m| &m.body))
            .chain(formation.aliens().map(|a| &a.body)),
    );
}

/// Remove every entity whose box no longer overlaps the world. This is the
/// same predicate the grid uses to accept an entity.
fn prune_out_of_bounds(session: &mut Session) {
    let bounds = session.bounds();
    let gone: Vec<EntityId> = session
        .entities()
        .filter(|e| !e.aabb().overlaps(&bounds))
        .map(|e| e.id)
        .collect();

    for id in gone {
        debug_assert!(!session.grid.contains(id));
        if let Some(kind) = session.despawn(id) {
            log::trace!("Pruned {:?} {} outside the world", kind, id);
        }
    }
}

/// The player shot takes out the first target it overlaps, lowest id first
fn resolve_player_shot(session: &mut Session) {
    let Some(shot) = session.player_shot.clone() else {
        return;
    };

    for other in session.grid.query(&shot) {
        if resolve(shot.kind, other.kind) != CollisionEffect::TargetDestroyed {
            continue;
        }
        let Some(points) = session.points_for(other.id) else {
            continue;
        };
        session.award(points);
        session.despawn(other.id);
        session.despawn(shot.id);
        return;
    }
}

/// Returns true if the cannon was destroyed this tick
fn resolve_player(session: &mut Session) -> bool {
    let Some(player) = session.player.as_ref().map(|p| p.body.clone()) else {
        return false;
    };

    for other in session.grid.query(&player) {
        if resolve(player.kind, other.kind) != CollisionEffect::PlayerDestroyed {
            continue;
        }
        if !session.is_alive(other.id) {
            continue;
        }
        session.despawn(other.id);
        session.despawn(player.id);
        return true;
    }
    false
}

/// Spend a life and respawn, or end the game when none are left
fn lose_life(session: &mut Session, hud: &mut dyn Hud) {
    match session.lives.checked_sub(1) {
        Some(lives) => {
            session.lives = lives;
            session.spawn_player();
            hud.update_lives(lives);
            log::info!("Player destroyed, {} lives left", lives);
        }
        None => {
            session.phase = GamePhase::GameOver;
            hud.show_game_over();
            log::info!(
                "Game over after {} ticks, final score {}",
                session.time_ticks,
                session.score
            );
        }
    }
}

fn formation_fire(session: &mut Session) {
    let chance = session.settings.tuning.alien_fire_chance;
    let Session { formation, rng, .. } = session;
    let origins: Vec<Vec2> = formation
        .columns
        .iter()
        .filter_map(|column| column.shoot(&mut *rng, chance))
        .collect();

    for origin in origins {
        session.spawn_enemy_shot(origin - Vec2::new(0.0, SHOT_SPAWN_OFFSET));
    }
}

fn update_motion(session: &mut Session, input: &TickInput, dt: f32) {
    if let Some(shot) = session.player_shot.as_mut() {
        shot.integrate(dt);
    }
    for shot in &mut session.enemy_shots {
        shot.integrate(dt);
    }
    for ship in &mut session.mystery_ships {
        ship.body.integrate(dt);
    }

    let world_width = session.settings.world_width;
    let Some(player) = session.player.as_mut() else {
        return;
    };
    player.steer(input, dt, world_width);
    if PlayerCannon::wants_to_fire(input, session.player_shot.as_ref()) {
        let muzzle = player.muzzle();
        session.spawn_player_shot(muzzle);
    }
}

fn report_score(session: &Session, before: u64, hud: &mut dyn Hud) {
    if session.score != before {
        hud.update_score(session.score);
    }
}
