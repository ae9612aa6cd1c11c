//! Lasso Orbs - a lasso-and-basket arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, grapple, scoring)
//! - `session`: Session controller wiring the sim to its collaborators
//! - `ui` / `audio`: Presentation and audio collaborator interfaces
//! - `highscores` / `persistence`: Best-score leaderboard and its file store
//! - `tuning`: Data-driven game balance
//! - `settings`: User preferences

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{ConfigError, SessionError, StoreError};
pub use highscores::{HighScoreEntry, HighScores, ScoreStore};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical tick period in milliseconds (all durations are counted in ticks)
    pub const TICK_MS: u64 = 15;

    /// Player sprite box (position is its top-left corner)
    pub const PLAYER_VISUAL_SIZE: f32 = 65.0;
    /// Player hitbox, centered in the visual box. Smaller on purpose.
    pub const PLAYER_HITBOX_SIZE: f32 = 25.0;

    /// Side of the square probe at the lasso tip
    pub const LASSO_TIP_SIZE: f32 = 8.0;

    /// Basket region, horizontally centered
    pub const BASKET_WIDTH: f32 = 130.0;
    pub const BASKET_HEIGHT: f32 = 170.0;
    /// Gap between the basket and the arena bottom
    pub const BASKET_BOTTOM_MARGIN: f32 = 50.0;

    /// Orbs spawn this far outside the arena edge
    pub const SPAWN_EDGE_OFFSET: f32 = 50.0;
    /// Keeps spawned orbs clear of the horizontal midline
    pub const SPAWN_BAND_MARGIN: f32 = 50.0;
}

/// Direction vector for an angle (radians)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle (radians) of the offset `from -> to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
