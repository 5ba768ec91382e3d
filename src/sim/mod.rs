//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID within each owner)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod formation;
pub mod grid;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{CollisionEffect, resolve};
pub use entity::{Aabb, Entity, EntityId, EntityKind, IdAllocator};
pub use formation::{Alien, AlienColumn, AlienGroup, Direction, Step};
pub use grid::{CollisionGrid, GridEntry};
pub use player::PlayerCannon;
pub use state::{GamePhase, MysteryShip, SceneMutation, Session, SessionError};
pub use tick::{TickInput, tick};
