//! Invaders - simulation core of a Space Invaders style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collision grid, formation, session tick)
//! - `assets`: Asset registry injected at startup (sizes, handles, score values)
//! - `hud`: One-way HUD notification collaborator
//! - `settings`: Data-driven world size and game tuning

pub mod assets;
pub mod hud;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetRegistry};
pub use hud::{Hud, LogHud};
pub use settings::{Settings, SettingsError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Default world dimensions (y grows upward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 650.0;

    /// Typical entity width, used to size the collision grid
    pub const STANDARD_ENTITY_WIDTH: f32 = 50.0;
    /// Collision grid cell edge
    pub const GRID_CELL_SIZE: f32 = 1.25 * STANDARD_ENTITY_WIDTH;
    /// Upper bound on collision grid cells, which caps the world size
    pub const MAX_GRID_CELLS: usize = 1 << 20;

    /// Player cannon
    pub const PLAYER_SPAWN_Y: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Shots travel vertically; sign encodes direction
    pub const SHOT_SPEED: f32 = 400.0;
    /// Vertical distance between a shooter and its freshly spawned shot
    pub const SHOT_SPAWN_OFFSET: f32 = 50.0;

    /// Formation layout
    pub const FORMATION_ORIGIN_X: f32 = 100.0;
    pub const FORMATION_ORIGIN_Y: f32 = 300.0;
    pub const FORMATION_COLUMNS: usize = 10;
    pub const FORMATION_SPACING: f32 = 60.0;
    /// Alien types per column, front (leading) to back
    pub const COLUMN_LAYOUT: [char; 5] = ['3', '3', '2', '2', '1'];

    /// Formation choreography
    pub const FORMATION_SPEED: f32 = 10.0;
    pub const FORMATION_PERIOD: f32 = 1.0;
    pub const FORMATION_DROP: f32 = 10.0;
    pub const EDGE_MARGIN: f32 = 50.0;
    /// Most formation steps a single update may run
    pub const MAX_FORMATION_STEPS: u64 = 10_000;

    /// Per column, per tick
    pub const ALIEN_FIRE_CHANCE: f64 = 0.001;

    /// Mystery ship
    pub const MYSTERY_SPAWN_CHANCE: f64 = 0.001;
    pub const MYSTERY_SPAWN_X: f32 = 50.0;
    /// Distance below the top of the world
    pub const MYSTERY_SPAWN_DROP: f32 = 50.0;
    pub const MYSTERY_SPEED: f32 = 150.0;
}
