//! Heads-up display collaborator
//!
//! The simulation pushes score and lives changes out through this trait;
//! nothing is ever read back.

/// One-way HUD notifications
pub trait Hud {
    fn update_score(&mut self, score: u64);
    fn update_lives(&mut self, lives: u32);
    fn show_game_over(&mut self);
}

/// HUD that writes every notification to the log
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn update_score(&mut self, score: u64) {
        log::info!("Score: {}", score);
    }

    fn update_lives(&mut self, lives: u32) {
        log::info!("Lives: {}", lives);
    }

    fn show_game_over(&mut self) {
        log::info!("Game Over");
    }
}

/// HUD that discards everything
#[derive(Debug, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn update_score(&mut self, _score: u64) {}
    fn update_lives(&mut self, _lives: u32) {}
    fn show_game_over(&mut self) {}
}
