//! Collision resolution table
//!
//! Overlaps are found by the grid; what an overlap *means* is decided here
//! from the two entity kinds alone. Pairs are unordered.

use super::entity::EntityKind;

/// Effect of two entities overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEffect {
    /// Nothing happens
    None,
    /// Player shot destroys an alien or mystery ship and scores its value
    TargetDestroyed,
    /// The cannon is destroyed along with the hazard; a life is lost
    PlayerDestroyed,
}

/// Look up the effect for a pair of kinds
pub fn resolve(a: EntityKind, b: EntityKind) -> CollisionEffect {
    use EntityKind::*;

    match (a, b) {
        (PlayerShot, Alien | MysteryShip) | (Alien | MysteryShip, PlayerShot) => {
            CollisionEffect::TargetDestroyed
        }
        (Player, Alien | EnemyShot) | (Alien | EnemyShot, Player) => CollisionEffect::PlayerDestroyed,
        _ => CollisionEffect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntityKind::*;

    const ALL: [EntityKind; 5] = [Player, Alien, MysteryShip, PlayerShot, EnemyShot];

    #[test]
    fn test_shot_hits_targets() {
        assert_eq!(resolve(PlayerShot, Alien), CollisionEffect::TargetDestroyed);
        assert_eq!(resolve(PlayerShot, MysteryShip), CollisionEffect::TargetDestroyed);
    }

    #[test]
    fn test_player_hazards() {
        assert_eq!(resolve(Player, Alien), CollisionEffect::PlayerDestroyed);
        assert_eq!(resolve(Player, EnemyShot), CollisionEffect::PlayerDestroyed);
        // Mystery ships fly overhead and never reach the cannon's row
        assert_eq!(resolve(Player, MysteryShip), CollisionEffect::None);
    }

    #[test]
    fn test_inert_pairs() {
        assert_eq!(resolve(PlayerShot, EnemyShot), CollisionEffect::None);
        assert_eq!(resolve(PlayerShot, Player), CollisionEffect::None);
        assert_eq!(resolve(EnemyShot, Alien), CollisionEffect::None);
        assert_eq!(resolve(Alien, Alien), CollisionEffect::None);
        assert_eq!(resolve(Alien, MysteryShip), CollisionEffect::None);
    }

    #[test]
    fn test_table_is_symmetric() {
        for a in ALL {
            for b in ALL {
                assert_eq!(resolve(a, b), resolve(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }
}
