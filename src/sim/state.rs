//! Session state and entity ownership
//!
//! The session owns every live entity. Aliens live inside the formation's
//! columns; everything else is held directly. All additions and removals go
//! through here so each one is mirrored as a scene mutation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Aabb, Entity, EntityId, EntityKind, IdAllocator};
use super::formation::AlienGroup;
use super::grid::CollisionGrid;
use super::player::PlayerCannon;
use crate::assets::{AssetError, AssetHandle, AssetRegistry};
use crate::consts::*;
use crate::hud::Hud;
use crate::settings::{Settings, SettingsError};

/// Startup failures; a running session never errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticking normally
    Playing,
    /// Out of lives; terminal
    GameOver,
}

/// Change the renderer must mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneMutation {
    Spawned {
        id: EntityId,
        kind: EntityKind,
        asset: AssetHandle,
        pos: Vec2,
        half_extents: Vec2,
    },
    Despawned {
        id: EntityId,
        kind: EntityKind,
    },
}

/// A mystery ship crossing the top of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MysteryShip {
    pub body: Entity,
    pub score: u32,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub assets: AssetRegistry,
    /// Seeded from `settings.seed`
    pub(crate) rng: Pcg32,
    /// Lives in reserve
    pub lives: u32,
    /// Never decreases
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// None only between destruction and respawn, or after game over
    pub player: Option<PlayerCannon>,
    /// Single in-flight player shot
    pub player_shot: Option<Entity>,
    pub enemy_shots: Vec<Entity>,
    pub mystery_ships: Vec<MysteryShip>,
    pub formation: AlienGroup,
    pub(crate) grid: CollisionGrid,
    pub(crate) mutations: Vec<SceneMutation>,
    ids: IdAllocator,
}

impl Session {
    /// Build a fresh game: player at the bottom, full formation, score 0.
    /// The HUD receives the initial score and lives.
    pub fn new(
        settings: Settings,
        assets: AssetRegistry,
        hud: &mut dyn Hud,
    ) -> Result<Self, SessionError> {
        settings.validate()?;
        assets.validate()?;

        let mut ids = IdAllocator::default();
        let formation = AlienGroup::new(
            Vec2::new(FORMATION_ORIGIN_X, FORMATION_ORIGIN_Y),
            FORMATION_COLUMNS,
            &COLUMN_LAYOUT,
            FORMATION_SPACING,
            &settings.tuning,
            settings.world_width,
            &assets,
            &mut ids,
        )?;

        let bounds = Aabb::world(settings.world_width, settings.world_height);
        let grid = CollisionGrid::new(bounds, GRID_CELL_SIZE).ok_or(SettingsError::Invalid {
            field: "world_width",
            reason: "world too large for the collision grid",
        })?;
        let mut session = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            lives: settings.tuning.starting_lives,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: None,
            player_shot: None,
            enemy_shots: Vec::new(),
            mystery_ships: Vec::new(),
            formation,
            grid,
            mutations: Vec::new(),
            ids,
            settings,
            assets,
        };

        let aliens: Vec<SceneMutation> = session
            .formation
            .aliens()
            .map(|a| spawned(&a.body, &a.asset))
            .collect();
        session.mutations.extend(aliens);

        hud.update_score(session.score);
        session.spawn_player();
        hud.update_lives(session.lives);

        log::info!(
            "Session started: seed={}, lives={}, aliens={}",
            session.settings.seed,
            session.lives,
            session.formation.len()
        );
        Ok(session)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// World rectangle; also the collision grid's extent
    pub fn bounds(&self) -> Aabb {
        self.grid.bounds()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Drain mutations produced since the last drain
    pub fn take_mutations(&mut self) -> Vec<SceneMutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Every live entity, in a stable order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.player
            .iter()
            .map(|p| &p.body)
            .chain(self.player_shot.iter())
            .chain(self.enemy_shots.iter())
            .chain(self.mystery_ships.iter().map(|m| &m.body))
            .chain(self.formation.aliens().map(|a| &a.body))
    }

    /// Look up a live entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities().find(|e| e.id == id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Point value of a live alien or mystery ship
    pub fn points_for(&self, id: EntityId) -> Option<u32> {
        self.formation.alien(id).map(|a| a.score).or_else(|| {
            self.mystery_ships
                .iter()
                .find(|m| m.body.id == id)
                .map(|m| m.score)
        })
    }

    /// Add points; score only ever grows
    pub fn award(&mut self, points: u32) {
        self.score += u64::from(points);
    }

    /// Place a new cannon at the default position
    pub fn spawn_player(&mut self) {
        let id = self.next_entity_id();
        let pos = Vec2::new(self.settings.world_width * 0.5, PLAYER_SPAWN_Y);
        let cannon = PlayerCannon::new(
            id,
            pos,
            self.assets.cannon.half_extents(),
            self.settings.tuning.player_speed,
        );
        self.mutations.push(spawned(&cannon.body, &self.assets.cannon.handle));
        self.player = Some(cannon);
    }

    /// Fill the player shot slot. Returns None, changing nothing, if the
    /// slot is already taken.
    pub fn spawn_player_shot(&mut self, pos: Vec2) -> Option<EntityId> {
        if self.player_shot.is_some() {
            return None;
        }
        let id = self.next_entity_id();
        let shot = Entity::new(
            id,
            EntityKind::PlayerShot,
            pos,
            self.assets.player_shot.half_extents(),
        )
        .with_velocity(Vec2::new(0.0, self.settings.tuning.shot_speed));
        self.mutations.push(spawned(&shot, &self.assets.player_shot.handle));
        self.player_shot = Some(shot);
        Some(id)
    }

    pub fn spawn_enemy_shot(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let shot = Entity::new(
            id,
            EntityKind::EnemyShot,
            pos,
            self.assets.enemy_shot.half_extents(),
        )
        .with_velocity(Vec2::new(0.0, -self.settings.tuning.shot_speed));
        self.mutations.push(spawned(&shot, &self.assets.enemy_shot.handle));
        self.enemy_shots.push(shot);
        id
    }

    /// Spawn a mystery ship at the top-left, worth a random table value
    pub fn spawn_mystery_ship(&mut self) -> EntityId {
        let scores = &self.assets.mystery_scores;
        let score = scores[self.rng.random_range(0..scores.len())];
        let id = self.next_entity_id();
        let pos = Vec2::new(
            MYSTERY_SPAWN_X,
            self.settings.world_height - MYSTERY_SPAWN_DROP,
        );
        let body = Entity::new(
            id,
            EntityKind::MysteryShip,
            pos,
            self.assets.mystery_ship.half_extents(),
        )
        .with_velocity(Vec2::new(self.settings.tuning.mystery_speed, 0.0));
        self.mutations.push(spawned(&body, &self.assets.mystery_ship.handle));
        self.mystery_ships.push(MysteryShip { body, score });
        log::debug!("Mystery ship {} spawned worth {}", id, score);
        id
    }

    /// Remove a live entity from whichever owner holds it. Removing the
    /// player shot frees the slot; removing an alien closes the gap in its
    /// column. Unknown or already-removed ids are ignored.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityKind> {
        let kind = self.take_entity(id)?;
        self.mutations.push(SceneMutation::Despawned { id, kind });
        Some(kind)
    }

    fn take_entity(&mut self, id: EntityId) -> Option<EntityKind> {
        if self.player.as_ref().is_some_and(|p| p.body.id == id) {
            return self.player.take().map(|p| p.body.kind);
        }
        if self.player_shot.as_ref().is_some_and(|s| s.id == id) {
            return self.player_shot.take().map(|s| s.kind);
        }
        if let Some(i) = self.enemy_shots.iter().position(|s| s.id == id) {
            return Some(self.enemy_shots.remove(i).kind);
        }
        if let Some(i) = self.mystery_ships.iter().position(|m| m.body.id == id) {
            return Some(self.mystery_ships.remove(i).body.kind);
        }
        self.formation.remove(id).map(|a| a.body.kind)
    }
}

fn spawned(entity: &Entity, asset: &AssetHandle) -> SceneMutation {
    SceneMutation::Spawned {
        id: entity.id,
        kind: entity.kind,
        asset: asset.clone(),
        pos: entity.pos,
        half_extents: entity.half_extents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::NullHud;

    #[derive(Default)]
    struct RecordingHud {
        scores: Vec<u64>,
        lives: Vec<u32>,
    }

    impl Hud for RecordingHud {
        fn update_score(&mut self, score: u64) {
            self.scores.push(score);
        }
        fn update_lives(&mut self, lives: u32) {
            self.lives.push(lives);
        }
        fn show_game_over(&mut self) {}
    }

    fn session() -> Session {
        Session::new(Settings::with_seed(12345), AssetRegistry::standard(), &mut NullHud).unwrap()
    }

    #[test]
    fn test_new_session() {
        let mut hud = RecordingHud::default();
        let mut state =
            Session::new(Settings::with_seed(1), AssetRegistry::standard(), &mut hud).unwrap();

        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(hud.scores, vec![0]);
        assert_eq!(hud.lives, vec![3]);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.body.pos, Vec2::new(400.0, 50.0));
        assert_eq!(state.formation.len(), 50);
        assert!(state.player_shot.is_none());

        // One spawn per alien plus the cannon
        let mutations = state.take_mutations();
        assert_eq!(mutations.len(), 51);
        assert!(mutations
            .iter()
            .all(|m| matches!(m, SceneMutation::Spawned { .. })));
        assert!(state.take_mutations().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_assets() {
        let mut assets = AssetRegistry::standard();
        assets.mystery_scores.clear();
        let result = Session::new(Settings::default(), assets, &mut NullHud);
        assert!(matches!(
            result,
            Err(SessionError::Asset(AssetError::EmptyScoreTable))
        ));
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.world_width = -1.0;
        let result = Session::new(settings, AssetRegistry::standard(), &mut NullHud);
        assert!(matches!(result, Err(SessionError::Settings(_))));
    }

    #[test]
    fn test_new_rejects_oversized_world() {
        let mut settings = Settings::default();
        settings.world_width = 1e30;
        let result = Session::new(settings, AssetRegistry::standard(), &mut NullHud);
        assert!(matches!(
            result,
            Err(SessionError::Settings(SettingsError::Invalid {
                field: "world_width",
                ..
            }))
        ));
    }

    #[test]
    fn test_rng_seeded_from_settings() {
        let fresh = || Session::new(Settings::with_seed(7), AssetRegistry::standard(), &mut NullHud);
        let mut a = fresh().unwrap();
        let mut b = fresh().unwrap();
        let rolls_a: Vec<u32> = (0..8).map(|_| a.rng.random()).collect();
        let rolls_b: Vec<u32> = (0..8).map(|_| b.rng.random()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.settings.seed, 7);
    }

    #[test]
    fn test_player_shot_slot_is_exclusive() {
        let mut state = session();
        let first = state.spawn_player_shot(Vec2::new(400.0, 100.0));
        assert!(first.is_some());
        assert!(state.spawn_player_shot(Vec2::new(200.0, 100.0)).is_none());
        assert_eq!(state.player_shot.as_ref().unwrap().pos, Vec2::new(400.0, 100.0));

        state.despawn(first.unwrap());
        assert!(state.player_shot.is_none());
        assert!(state.spawn_player_shot(Vec2::new(200.0, 100.0)).is_some());
    }

    #[test]
    fn test_despawn_alien_closes_column() {
        let mut state = session();
        let leader = state.formation.columns[3].leading().unwrap().body.id;
        state.take_mutations();

        assert_eq!(state.despawn(leader), Some(EntityKind::Alien));
        assert_eq!(state.formation.columns[3].aliens.len(), 4);
        assert_eq!(
            state.take_mutations(),
            vec![SceneMutation::Despawned {
                id: leader,
                kind: EntityKind::Alien
            }]
        );

        // Already gone: no-op
        assert_eq!(state.despawn(leader), None);
        assert!(state.take_mutations().is_empty());
    }

    #[test]
    fn test_mystery_ship_score_from_table() {
        let mut state = session();
        for _ in 0..20 {
            let id = state.spawn_mystery_ship();
            let points = state.points_for(id).unwrap();
            assert!([10, 50, 100, 200].contains(&points));
        }
        let ship = &state.mystery_ships[0];
        assert_eq!(ship.body.pos, Vec2::new(50.0, 600.0));
        assert_eq!(ship.body.vel, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_entity_lookup() {
        let mut state = session();
        let shot = state.spawn_enemy_shot(Vec2::new(100.0, 250.0));
        assert_eq!(state.entity(shot).unwrap().kind, EntityKind::EnemyShot);
        assert_eq!(state.entity(shot).unwrap().vel, Vec2::new(0.0, -400.0));
        assert!(state.is_alive(shot));
        state.despawn(shot);
        assert!(!state.is_alive(shot));
        assert_eq!(state.entities().count(), 51);
    }
}
