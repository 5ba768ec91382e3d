//! Entity model shared by every actor
//!
//! Every actor is an axis-aligned box with a position and a velocity; the
//! kind tag decides how collisions between two actors resolve.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity identifier, unique for the lifetime of a session
pub type EntityId = u32;

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Alien,
    MysteryShip,
    PlayerShot,
    EnemyShot,
}

impl EntityKind {
    /// Aliens and mystery ships: things a player shot can score on
    pub fn is_target(self) -> bool {
        matches!(self, EntityKind::Alien | EntityKind::MysteryShip)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// World rectangle anchored at the origin
    pub fn world(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// A movable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Continuous velocity (units/s); zero for actors moved in discrete steps
    pub vel: Vec2,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, half_extents: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            half_extents,
            vel: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.aabb().overlaps(&other.aabb())
    }

    /// Shift by a fixed offset
    pub fn translate(&mut self, offset: Vec2) {
        self.pos += offset;
    }

    /// Advance along the current velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Hands out entity ids in increasing order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}
