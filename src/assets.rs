//! Asset registry
//!
//! Logical sizes, opaque render handles and score values for every actor.
//! Built once at startup and handed to the session; the simulation never
//! touches image data, only the sizes needed for bounding boxes.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while looking up or validating assets
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("no alien asset registered for type '{0}'")]
    UnknownAlienType(char),
    #[error("asset `{0}` has a non-positive size")]
    InvalidSize(String),
    #[error("mystery ship score table is empty")]
    EmptyScoreTable,
}

/// Opaque handle the renderer resolves to an image or animation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub String);

impl AssetHandle {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Handle plus logical size of a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAsset {
    pub handle: AssetHandle,
    pub width: f32,
    pub height: f32,
}

impl SpriteAsset {
    pub fn new(name: &str, width: f32, height: f32) -> Self {
        Self {
            handle: AssetHandle::new(name),
            width,
            height,
        }
    }

    /// Bounding box half-extents derived from the visual size
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// An alien type: animated sprite and the points it is worth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlienAsset {
    pub sprite: SpriteAsset,
    pub score: u32,
}

/// All assets the simulation needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegistry {
    pub cannon: SpriteAsset,
    pub player_shot: SpriteAsset,
    pub enemy_shot: SpriteAsset,
    pub mystery_ship: SpriteAsset,
    /// Possible mystery ship values, one picked at random per spawn
    pub mystery_scores: Vec<u32>,
    aliens: BTreeMap<char, AlienAsset>,
}

impl AssetRegistry {
    /// The classic table: three alien types worth 40/20/10 and a mystery
    /// ship worth 10, 50, 100 or 200.
    pub fn standard() -> Self {
        let mut aliens = BTreeMap::new();
        aliens.insert(
            '1',
            AlienAsset {
                sprite: SpriteAsset::new("images/alien1.png", 32.0, 32.0),
                score: 40,
            },
        );
        aliens.insert(
            '2',
            AlienAsset {
                sprite: SpriteAsset::new("images/alien2.png", 44.0, 32.0),
                score: 20,
            },
        );
        aliens.insert(
            '3',
            AlienAsset {
                sprite: SpriteAsset::new("images/alien3.png", 48.0, 32.0),
                score: 10,
            },
        );

        Self {
            cannon: SpriteAsset::new("images/cannon.png", 50.0, 30.0),
            player_shot: SpriteAsset::new("images/laser.png", 4.0, 16.0),
            enemy_shot: SpriteAsset::new("images/shoot.png", 6.0, 16.0),
            mystery_ship: SpriteAsset::new("images/alien4.png", 64.0, 28.0),
            mystery_scores: vec![10, 50, 100, 200],
            aliens,
        }
    }

    /// Register or replace an alien type
    pub fn insert_alien(&mut self, key: char, asset: AlienAsset) {
        self.aliens.insert(key, asset);
    }

    /// Look up an alien type by its key
    pub fn alien(&self, key: char) -> Result<&AlienAsset, AssetError> {
        self.aliens.get(&key).ok_or(AssetError::UnknownAlienType(key))
    }

    /// Check every registered asset is usable
    pub fn validate(&self) -> Result<(), AssetError> {
        let sprites = [&self.cannon, &self.player_shot, &self.enemy_shot, &self.mystery_ship]
            .into_iter()
            .chain(self.aliens.values().map(|a| &a.sprite));
        for sprite in sprites {
            if !(sprite.width > 0.0 && sprite.height > 0.0) {
                return Err(AssetError::InvalidSize(sprite.handle.as_str().to_string()));
            }
        }
        if self.mystery_scores.is_empty() {
            return Err(AssetError::EmptyScoreTable);
        }
        Ok(())
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_alien_scores() {
        let assets = AssetRegistry::standard();
        assert_eq!(assets.alien('1').unwrap().score, 40);
        assert_eq!(assets.alien('2').unwrap().score, 20);
        assert_eq!(assets.alien('3').unwrap().score, 10);
        assert_eq!(assets.mystery_scores, vec![10, 50, 100, 200]);
        assert!(assets.validate().is_ok());
    }

    #[test]
    fn test_unknown_alien_type() {
        let assets = AssetRegistry::standard();
        assert_eq!(assets.alien('9'), Err(AssetError::UnknownAlienType('9')));
    }

    #[test]
    fn test_insert_custom_alien_type() {
        let mut assets = AssetRegistry::standard();
        assets.insert_alien(
            '4',
            AlienAsset {
                sprite: SpriteAsset::new("images/alien5.png", 30.0, 30.0),
                score: 80,
            },
        );
        let alien = assets.alien('4').unwrap();
        assert_eq!(alien.score, 80);
        assert_eq!(alien.sprite.handle.as_str(), "images/alien5.png");
        assert!(assets.validate().is_ok());

        // Replacing a type keeps the others
        assets.insert_alien(
            '1',
            AlienAsset {
                sprite: SpriteAsset::new("images/alien1.png", 0.0, 32.0),
                score: 40,
            },
        );
        assert_eq!(assets.alien('2').unwrap().score, 20);
        assert!(matches!(assets.validate(), Err(AssetError::InvalidSize(_))));
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let mut assets = AssetRegistry::standard();
        assets.player_shot.width = 0.0;
        assert!(matches!(assets.validate(), Err(AssetError::InvalidSize(_))));

        let mut assets = AssetRegistry::standard();
        assets.mystery_scores.clear();
        assert_eq!(assets.validate(), Err(AssetError::EmptyScoreTable));
    }

    #[test]
    fn test_half_extents() {
        let sprite = SpriteAsset::new("x", 50.0, 30.0);
        assert_eq!(sprite.half_extents(), Vec2::new(25.0, 15.0));
    }
}
