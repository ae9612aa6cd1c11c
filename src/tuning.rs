//! Data-driven game balance
//!
//! Every balance knob the simulation reads lives here so variants can be
//! tried from a JSON file instead of a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game balance values. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ticks between spawn attempts
    pub spawn_interval: u64,
    /// Active collectible cap
    pub max_population: usize,
    /// Probability a spawn is a bomb
    pub bomb_chance: f64,
    /// Probability a spawn is a bonus star (drawn after the bomb band)
    pub bonus_chance: f64,
    /// Orb horizontal speed range (pixels per tick, inclusive)
    pub orb_min_speed: u32,
    pub orb_max_speed: u32,
    /// Orb size range (pixels, inclusive)
    pub orb_min_size: u32,
    pub orb_max_size: u32,
    /// Orb point value range (inclusive)
    pub orb_min_value: u32,
    pub orb_max_value: u32,
    /// Ticks added to each bonus effect per star
    pub bonus_duration_ticks: u32,
    /// Cap on accumulated bonus effect ticks
    pub max_bonus_duration_ticks: u32,
    /// Star value multiplier on attach
    pub bonus_point_multiplier: u32,
    /// Lasso extend/retract step per tick
    pub lasso_speed: f32,
    /// Player step per movement input
    pub player_base_speed: f32,
    pub player_boost_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval: 50,
            max_population: 10,
            bomb_chance: 0.3,
            bonus_chance: 0.2,
            orb_min_speed: 2,
            orb_max_speed: 5,
            orb_min_size: 40,
            orb_max_size: 60,
            orb_min_value: 1,
            orb_max_value: 10,
            bonus_duration_ticks: 600,
            max_bonus_duration_ticks: 1800,
            bonus_point_multiplier: 1,
            lasso_speed: 10.0,
            player_base_speed: 7.0,
            player_boost_speed: 15.0,
        }
    }
}

impl Tuning {
    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
        }

        if self.spawn_interval == 0 {
            return Err(invalid("spawn_interval", "must be at least 1"));
        }
        let chances = [
            ("bomb_chance", self.bomb_chance),
            ("bonus_chance", self.bonus_chance),
        ];
        for (field, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, format!("{chance} is outside [0, 1]")));
            }
        }
        if self.bomb_chance + self.bonus_chance > 1.0 {
            return Err(invalid("bonus_chance", "bomb_chance + bonus_chance exceeds 1"));
        }
        if self.orb_min_speed > self.orb_max_speed {
            return Err(invalid("orb_min_speed", "greater than orb_max_speed"));
        }
        if self.orb_min_size == 0 || self.orb_min_size > self.orb_max_size {
            return Err(invalid("orb_min_size", "must be positive and not above orb_max_size"));
        }
        if self.orb_min_value > self.orb_max_value {
            return Err(invalid("orb_min_value", "greater than orb_max_value"));
        }
        if self.bonus_duration_ticks > self.max_bonus_duration_ticks {
            return Err(invalid("bonus_duration_ticks", "greater than max_bonus_duration_ticks"));
        }
        if self.lasso_speed <= 0.0 {
            return Err(invalid("lasso_speed", "must be positive"));
        }
        Ok(())
    }
}
