//! Game settings and tuning
//!
//! Loaded once at startup from JSON; every field falls back to the
//! classic arcade defaults when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Horizontal cannon speed (units/s)
    pub player_speed: f32,
    /// Lives at session start
    pub starting_lives: u32,
    /// Vertical shot speed (units/s, unsigned)
    pub shot_speed: f32,

    // === Formation ===
    /// Sideways speed (units/s); one step moves `speed * period`
    pub formation_speed: f32,
    /// Seconds between discrete formation steps
    pub formation_period: f32,
    /// Vertical drop applied on a turn-around step
    pub formation_drop: f32,
    /// Distance from the screen edge that triggers a turn
    pub edge_margin: f32,
    /// Chance per column per tick that the leading alien fires
    pub alien_fire_chance: f64,

    // === Mystery ship ===
    /// Chance per tick that a mystery ship appears
    pub mystery_spawn_chance: f64,
    /// Horizontal mystery ship speed (units/s)
    pub mystery_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            starting_lives: STARTING_LIVES,
            shot_speed: SHOT_SPEED,

            formation_speed: FORMATION_SPEED,
            formation_period: FORMATION_PERIOD,
            formation_drop: FORMATION_DROP,
            edge_margin: EDGE_MARGIN,
            alien_fire_chance: ALIEN_FIRE_CHANCE,

            mystery_spawn_chance: MYSTERY_SPAWN_CHANCE,
            mystery_speed: MYSTERY_SPEED,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// World (screen) width; also the collision grid width
    pub world_width: f32,
    /// World (screen) height; also the collision grid height
    pub world_height: f32,
    /// Seed for every random roll in the session
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            seed: 0,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Default settings with a specific RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(invalid("world_width", "must be positive and finite"));
        }
        if !(self.world_height.is_finite() && self.world_height > 0.0) {
            return Err(invalid("world_height", "must be positive and finite"));
        }
        let cols = (f64::from(self.world_width) / f64::from(GRID_CELL_SIZE)).ceil();
        let rows = (f64::from(self.world_height) / f64::from(GRID_CELL_SIZE)).ceil();
        if cols * rows > MAX_GRID_CELLS as f64 {
            return Err(invalid("world_width", "world too large for the collision grid"));
        }

        let t = &self.tuning;
        if !(t.formation_period.is_finite() && t.formation_period > 0.0) {
            return Err(invalid("formation_period", "must be positive and finite"));
        }
        let finite = [
            ("player_speed", t.player_speed),
            ("shot_speed", t.shot_speed),
            ("formation_speed", t.formation_speed),
            ("formation_drop", t.formation_drop),
            ("edge_margin", t.edge_margin),
            ("mystery_speed", t.mystery_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }
        if !(0.0..=1.0).contains(&t.alien_fire_chance) {
            return Err(invalid("alien_fire_chance", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&t.mystery_spawn_chance) {
            return Err(invalid("mystery_spawn_chance", "must be within [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_arcade_layout() {
        let settings = Settings::default();
        assert_eq!(settings.world_width, 800.0);
        assert_eq!(settings.world_height, 650.0);
        assert_eq!(settings.tuning.starting_lives, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "tuning": { "player_speed": 300.0 } }"#)
            .expect("valid settings");
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.tuning.player_speed, 300.0);
        assert_eq!(settings.tuning.formation_period, FORMATION_PERIOD);
        assert_eq!(settings.world_width, WORLD_WIDTH);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = Settings::from_json(r#"{ "tuning": { "alien_fire_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "alien_fire_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_oversized_world_rejected() {
        let err = Settings::from_json(r#"{ "world_width": 1e30 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "world_width",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut settings = Settings::default();
        settings.world_height = f32::INFINITY;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.tuning.player_speed = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "player_speed",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.tuning.formation_period = f32::INFINITY;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut settings = Settings::default();
        settings.tuning.formation_period = 0.0;
        assert!(settings.validate().is_err());
    }
}
