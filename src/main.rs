//! Invaders entry point
//!
//! Headless native runner: loads settings, then drives a session with a
//! scripted autopilot at a fixed 60 Hz until game over or the tick limit.

use invaders::sim::{GamePhase, SceneMutation, Session, TickInput, tick};
use invaders::{AssetRegistry, LogHud, Settings};

/// Fixed frame time for the headless loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Ten minutes of play at 60 Hz
const MAX_TICKS: u64 = 60 * 60 * 10;

/// Sweep back and forth across the screen, firing whenever possible
fn autopilot(frame: u64) -> TickInput {
    let phase = frame % 240;
    TickInput {
        left: phase < 120,
        right: phase >= 120,
        fire: true,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Invaders (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Could not load settings from {}: {}; using defaults", path, e);
            Settings::default()
        }),
        None => Settings::default(),
    };

    let mut hud = LogHud;
    let mut session = match Session::new(settings, AssetRegistry::standard(), &mut hud) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    let mut spawned = 0usize;
    let mut despawned = 0usize;
    for frame in 0..MAX_TICKS {
        let input = autopilot(frame);
        for mutation in tick(&mut session, &input, FRAME_DT, &mut hud) {
            match mutation {
                SceneMutation::Spawned { .. } => spawned += 1,
                SceneMutation::Despawned { .. } => despawned += 1,
            }
        }
        if session.phase == GamePhase::GameOver || session.formation.is_empty() {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: score={}, lives={}, aliens left={}, spawned={}, despawned={}",
        session.time_ticks,
        session.score,
        session.lives,
        session.formation.len(),
        spawned,
        despawned
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `tick` from the host page
}
