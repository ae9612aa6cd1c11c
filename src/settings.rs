//! User preferences
//!
//! Kept apart from [`Tuning`](crate::tuning::Tuning): these change how a
//! session is presented and run, never the rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Runner ===
    /// Milliseconds per tick when pacing in real time
    pub tick_ms: u64,
    /// Sleep between ticks; off runs as fast as possible
    pub realtime: bool,
    /// Let the AI play
    pub autopilot: bool,
    /// Stop the headless run after this many ticks
    pub max_ticks: u64,

    // === Storage ===
    /// Leaderboard JSON file
    pub scores_path: PathBuf,
    /// Balance overrides (JSON), if any
    pub tuning_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            tick_ms: TICK_MS,
            realtime: false,
            autopilot: true,
            max_ticks: 20_000,

            scores_path: PathBuf::from("lasso_orbs_scores.json"),
            tuning_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when it is
    /// missing or malformed
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "lasso_orbs_settings_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(temp_path("missing"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "muted": true, "tick_ms": 30 }"#).unwrap();
        let settings = Settings::load(&path);
        let _ = fs::remove_file(&path);

        assert!(settings.muted);
        assert_eq!(settings.tick_ms, 30);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "not json").unwrap();
        let settings = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let settings = Settings {
            realtime: true,
            max_ticks: 5,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
