//! Lasso Orbs entry point
//!
//! Headless runner: plays one session (autopilot by default), records the
//! result and prints the leaderboard.
//!
//! Usage: `lasso-orbs [username] [seed]`. Settings are read from
//! `$LASSO_ORBS_SETTINGS` or `lasso_orbs_settings.json`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use lasso_orbs::audio::AudioManager;
    use lasso_orbs::persistence::JsonFileStore;
    use lasso_orbs::sim::{GameState, TickInput};
    use lasso_orbs::ui::ConsoleUi;
    use lasso_orbs::{ScoreStore, Session, Settings, Tuning};

    /// Arena size used when no window reports one
    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    const DEFAULT_SETTINGS_PATH: &str = "lasso_orbs_settings.json";

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let username = args.next().unwrap_or_else(|| "autopilot".to_string());
        let seed = match args.next() {
            Some(raw) => raw.parse::<u64>()?,
            None => clock_seed(),
        };

        let settings_path = std::env::var("LASSO_ORBS_SETTINGS")
            .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        let settings = Settings::load(&settings_path);
        let tuning = match &settings.tuning_path {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };

        let state = GameState::try_new(seed, tuning, ARENA)?;
        let mut session = Session::new(
            &username,
            state,
            ConsoleUi::new(),
            AudioManager::from_settings(&settings),
            JsonFileStore::new(&settings.scores_path),
        )?;
        session.start();

        let input = TickInput {
            arena_size: Some(ARENA),
            autopilot: settings.autopilot,
            ..Default::default()
        };
        let tick_period = Duration::from_millis(settings.tick_ms);
        let started = Instant::now();

        let mut outcome = None;
        for _ in 0..settings.max_ticks {
            let tick_start = Instant::now();
            outcome = session.tick(&input);
            if outcome.is_some() {
                break;
            }
            if settings.realtime {
                if let Some(rest) = tick_period.checked_sub(tick_start.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
        let outcome = match outcome {
            Some(outcome) => outcome,
            None => session.stop().ok_or("session did not end")?,
        };

        log::info!(
            "{} ticks in {:.2?} (seed {})",
            session.state().time_ticks,
            started.elapsed(),
            seed
        );
        println!(
            "{}: {:?} with {} points, {} orbs",
            session.username(),
            outcome.reason,
            outcome.final_score,
            outcome.final_count
        );

        println!("\nLeaderboard");
        match session.store().list_all() {
            Ok(entries) if entries.is_empty() => println!("  (empty)"),
            Ok(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    println!(
                        "  {:>2}. {:<16} {:>6} pts {:>4} orbs",
                        i + 1,
                        entry.username,
                        entry.score,
                        entry.count
                    );
                }
            }
            Err(e) => log::warn!("Could not read leaderboard: {}", e),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lasso Orbs (native) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the wasm surface
}
