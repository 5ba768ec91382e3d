//! Player cannon
//!
//! Steered by the per-tick input snapshot. Firing is gated by the session's
//! single player-shot slot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};
use super::tick::TickInput;
use crate::consts::SHOT_SPAWN_OFFSET;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCannon {
    pub body: Entity,
    /// Horizontal speed (units/s)
    pub speed: f32,
}

impl PlayerCannon {
    pub fn new(id: EntityId, pos: Vec2, half_extents: Vec2, speed: f32) -> Self {
        Self {
            body: Entity::new(id, EntityKind::Player, pos, half_extents),
            speed,
        }
    }

    /// Move left/right. The move only happens if the cannon stays fully on
    /// screen afterwards.
    pub fn steer(&mut self, input: &TickInput, dt: f32, world_width: f32) {
        let movement = input.movement();
        if movement == 0.0 {
            return;
        }

        let new_x = self.body.pos.x + self.speed * movement * dt;
        let half_width = self.body.half_extents.x;
        if (half_width..=world_width - half_width).contains(&new_x) {
            self.body.pos.x = new_x;
        }
    }

    /// Whether a shot should be spawned this tick. Holding fire while a
    /// shot is still in flight does nothing; nothing is queued.
    pub fn wants_to_fire(input: &TickInput, shot_slot: Option<&Entity>) -> bool {
        input.fire && shot_slot.is_none()
    }

    /// Where a fresh player shot appears
    pub fn muzzle(&self) -> Vec2 {
        self.body.pos + Vec2::new(0.0, SHOT_SPAWN_OFFSET)
    }
}
