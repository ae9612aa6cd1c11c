//! Presentation collaborator
//!
//! The session reports catches, the game-over result and the return to the
//! menu through [`PresentationSink`]. [`ConsoleUi`] is the headless sink used
//! by the native runner; it logs everything and keeps the last result.

use crate::sim::CollectibleKind;

/// How a game-over result should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal end (player quit)
    Info,
    /// Loss (bomb)
    Error,
}

pub trait PresentationSink {
    /// The lasso hooked `item` at the tip position
    fn notify_catch(&mut self, item: CollectibleKind, tip_x: f32, tip_y: f32);

    /// Show the final result
    fn notify_game_over(&mut self, title: &str, message: &str, severity: Severity);

    /// Leave the game screen
    fn request_return_to_menu(&mut self);
}

/// Result shown by the last `notify_game_over`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverNotice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// Log-backed presentation sink
#[derive(Debug, Default)]
pub struct ConsoleUi {
    pub catches: u32,
    pub last_notice: Option<GameOverNotice>,
    pub in_menu: bool,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSink for ConsoleUi {
    fn notify_catch(&mut self, item: CollectibleKind, tip_x: f32, tip_y: f32) {
        self.catches += 1;
        log::debug!("Caught {:?} at ({:.0}, {:.0})", item, tip_x, tip_y);
    }

    fn notify_game_over(&mut self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("{}: {}", title, message.replace('\n', " ")),
            Severity::Error => log::warn!("{}: {}", title, message.replace('\n', " ")),
        }
        self.last_notice = Some(GameOverNotice {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }

    fn request_return_to_menu(&mut self) {
        log::info!("Returning to menu");
        self.in_menu = true;
    }
}
