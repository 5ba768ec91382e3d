//! Alien formation choreography
//!
//! The formation moves in discrete steps on a fixed period, independent of
//! the frame rate. A step is either a sideways shuffle or, when any column's
//! leading alien reaches the screen edge, a drop with a direction flip.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, IdAllocator};
use crate::assets::{AssetError, AssetHandle, AssetRegistry};
use crate::consts::MAX_FORMATION_STEPS;
use crate::settings::Tuning;

/// Horizontal travel direction of the whole formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// One alien. `column` is the owning column's index, used only to route
/// removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alien {
    pub body: Entity,
    pub alien_type: char,
    pub score: u32,
    pub asset: AssetHandle,
    pub column: usize,
}

impl Alien {
    /// Build an alien of a registered type
    pub fn from_type(
        id: EntityId,
        pos: Vec2,
        alien_type: char,
        column: usize,
        assets: &AssetRegistry,
    ) -> Result<Self, AssetError> {
        let asset = assets.alien(alien_type)?;
        Ok(Self {
            body: Entity::new(id, EntityKind::Alien, pos, asset.sprite.half_extents()),
            alien_type,
            score: asset.score,
            asset: asset.sprite.handle.clone(),
            column,
        })
    }
}

/// Aliens stacked front to back; the first one leads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlienColumn {
    pub aliens: Vec<Alien>,
}

impl AlienColumn {
    /// Stack one alien per layout entry, `spacing` apart going up from `origin`
    pub fn new(
        index: usize,
        origin: Vec2,
        layout: &[char],
        spacing: f32,
        assets: &AssetRegistry,
        ids: &mut IdAllocator,
    ) -> Result<Self, AssetError> {
        let aliens = layout
            .iter()
            .enumerate()
            .map(|(row, &alien_type)| {
                let pos = origin + Vec2::new(0.0, row as f32 * spacing);
                Alien::from_type(ids.next_id(), pos, alien_type, index, assets)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { aliens })
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    /// First living alien; fires for the column and marks its edge
    pub fn leading(&self) -> Option<&Alien> {
        self.aliens.first()
    }

    /// Whether the leading alien has reached the edge it is heading toward.
    /// An empty column never asks to turn.
    pub fn should_turn(&self, direction: Direction, world_width: f32, margin: f32) -> bool {
        let Some(alien) = self.leading() else {
            return false;
        };
        let x = alien.body.pos.x;
        match direction {
            Direction::Right => x >= world_width - margin,
            Direction::Left => x < margin,
        }
    }

    /// Roll for a shot; on success returns the leading alien's position
    pub fn shoot(&self, rng: &mut impl Rng, chance: f64) -> Option<Vec2> {
        if rng.random_bool(chance) {
            self.leading().map(|alien| alien.body.pos)
        } else {
            None
        }
    }

    /// Remove an alien; whoever is next in line becomes the leader
    pub fn remove(&mut self, id: EntityId) -> Option<Alien> {
        let index = self.aliens.iter().position(|a| a.body.id == id)?;
        Some(self.aliens.remove(index))
    }
}

/// Outcome of one discrete formation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Moved sideways by the offset
    Shift(Vec2),
    /// Dropped by the offset and reversed direction
    Turn(Vec2),
}

impl Step {
    pub fn offset(self) -> Vec2 {
        match self {
            Step::Shift(offset) | Step::Turn(offset) => offset,
        }
    }
}

/// The whole invading formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienGroup {
    pub columns: Vec<AlienColumn>,
    pub direction: Direction,
    /// Sideways speed (units/s)
    pub speed: f32,
    /// Seconds accumulated toward the next step
    pub elapsed: f64,
    /// Seconds per step
    pub period: f32,
    /// Vertical drop on a turn
    pub drop: f32,
    pub margin: f32,
    pub world_width: f32,
}

impl AlienGroup {
    /// Wrap prebuilt columns, heading right
    pub fn from_columns(columns: Vec<AlienColumn>, tuning: &Tuning, world_width: f32) -> Self {
        Self {
            columns,
            direction: Direction::Right,
            speed: tuning.formation_speed,
            elapsed: 0.0,
            period: tuning.formation_period,
            drop: tuning.formation_drop,
            margin: tuning.edge_margin,
            world_width,
        }
    }

    /// Lay out `column_count` columns of `layout`, `spacing` apart in both axes
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: Vec2,
        column_count: usize,
        layout: &[char],
        spacing: f32,
        tuning: &Tuning,
        world_width: f32,
        assets: &AssetRegistry,
        ids: &mut IdAllocator,
    ) -> Result<Self, AssetError> {
        let columns = (0..column_count)
            .map(|i| {
                let column_origin = origin + Vec2::new(i as f32 * spacing, 0.0);
                AlienColumn::new(i, column_origin, layout, spacing, assets, ids)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_columns(columns, tuning, world_width))
    }

    /// Accumulate time and run every step that came due, at most
    /// `MAX_FORMATION_STEPS` per call. Steps beyond the cap are dropped and
    /// the remainder keeps its phase within the current period. Negative or
    /// non-finite deltas are ignored.
    pub fn update(&mut self, dt: f32) -> Vec<Step> {
        if !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }
        self.elapsed += f64::from(dt);

        let period = f64::from(self.period);
        let due = (self.elapsed / period).floor();
        if due < 1.0 {
            return Vec::new();
        }
        self.elapsed = (self.elapsed - due * period).clamp(0.0, period);

        // Saturating cast
        let due = due as u64;
        if due > MAX_FORMATION_STEPS {
            log::warn!(
                "Formation fell {} steps behind, running only {}",
                due,
                MAX_FORMATION_STEPS
            );
        }
        (0..due.min(MAX_FORMATION_STEPS)).map(|_| self.step()).collect()
    }

    /// One discrete move of every living alien
    pub fn step(&mut self) -> Step {
        let step = if self.side_reached() {
            self.direction = self.direction.flipped();
            log::debug!("Formation turned, now heading {:?}", self.direction);
            Step::Turn(Vec2::new(0.0, -self.drop))
        } else {
            Step::Shift(Vec2::new(self.direction.sign() * self.speed * self.period, 0.0))
        };

        let offset = step.offset();
        for alien in self.aliens_mut() {
            alien.body.translate(offset);
        }
        step
    }

    /// Whether any non-empty column's leader is at the edge ahead
    pub fn side_reached(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.should_turn(self.direction, self.world_width, self.margin))
    }

    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.columns.iter().flat_map(|c| c.aliens.iter())
    }

    pub fn aliens_mut(&mut self) -> impl Iterator<Item = &mut Alien> {
        self.columns.iter_mut().flat_map(|c| c.aliens.iter_mut())
    }

    pub fn alien(&self, id: EntityId) -> Option<&Alien> {
        self.aliens().find(|a| a.body.id == id)
    }

    /// Remove an alien from whichever column holds it
    pub fn remove(&mut self, id: EntityId) -> Option<Alien> {
        self.columns.iter_mut().find_map(|c| c.remove(id))
    }

    /// Living aliens across all columns
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.aliens.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(AlienColumn::is_empty)
    }
}
