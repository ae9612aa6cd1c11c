//! Session controller
//!
//! Owns one [`GameState`] from start to finish and turns simulation events
//! into calls on its collaborators: presentation, audio and the score store.
//! A session is single-use; start a new one for the next game.

use crate::audio::AudioCues;
use crate::error::SessionError;
use crate::highscores::ScoreStore;
use crate::sim::{EndReason, GameEvent, GamePhase, GameState, SessionEnded, TickInput, tick};
use crate::ui::{PresentationSink, Severity};

/// Trim a username, rejecting blank ones
pub fn validate_username(raw: &str) -> Result<String, SessionError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SessionError::BlankUsername);
    }
    Ok(name.to_string())
}

/// Title, message and severity shown when a session ends
pub fn game_over_notice(outcome: &SessionEnded) -> (&'static str, String, Severity) {
    let summary = format!(
        "Your Final Score: {} points.\nCount: {} Star.",
        outcome.final_score, outcome.final_count
    );
    match outcome.reason {
        EndReason::BombCollision => ("GAME OVER!!!", summary, Severity::Error),
        EndReason::BombAttached => (
            "GAME OVER!",
            format!("A bomb exploded on you!\n{}", summary),
            Severity::Error,
        ),
        EndReason::BombDeposited => (
            "GAME OVER",
            format!("You brought a bomb to the basket! Score: {}", outcome.final_score),
            Severity::Error,
        ),
        EndReason::PlayerStopped => ("Game stopped", summary, Severity::Info),
    }
}

pub struct Session<U, A, S> {
    state: GameState,
    username: String,
    ui: U,
    audio: A,
    store: S,
}

impl<U, A, S> Session<U, A, S>
where
    U: PresentationSink,
    A: AudioCues,
    S: ScoreStore,
{
    /// Create a session for `username` around a fresh `state`.
    ///
    /// Fails on a blank username; nothing is started in that case.
    pub fn new(
        username: &str,
        state: GameState,
        ui: U,
        audio: A,
        store: S,
    ) -> Result<Self, SessionError> {
        let username = validate_username(username)?;
        Ok(Self {
            state,
            username,
            ui,
            audio,
            store,
        })
    }

    /// Begin play and start the background loop
    pub fn start(&mut self) -> bool {
        if !self.state.start() {
            return false;
        }
        log::info!(
            "Session started for {} (seed {}, arena {:.0}x{:.0})",
            self.username,
            self.state.seed,
            self.state.arena.x,
            self.state.arena.y
        );
        self.audio.start_background();
        true
    }

    /// Advance one tick and dispatch what happened
    pub fn tick(&mut self, input: &TickInput) -> Option<SessionEnded> {
        let ended = tick(&mut self.state, input);
        for event in self.state.drain_events() {
            self.dispatch(event);
        }
        ended
    }

    /// End the session at the player's request
    pub fn stop(&mut self) -> Option<SessionEnded> {
        self.tick(&TickInput {
            stop: true,
            ..Default::default()
        })
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Caught { kind, tip, .. } => self.ui.notify_catch(kind, tip.x, tip.y),
            GameEvent::BonusCollected { .. } => {
                self.audio.stop_background();
                self.audio.play_bonus_loop();
            }
            GameEvent::BonusExpired => {
                self.audio.stop_bonus_loop();
                self.audio.start_background();
            }
            GameEvent::BombDefused { id } => log::debug!("Bomb #{} defused", id),
            GameEvent::Deposited { .. } => {}
            GameEvent::Ended(outcome) => self.finish(outcome),
        }
    }

    fn finish(&mut self, outcome: SessionEnded) {
        log::info!(
            "Session over for {}: {:?}, score {}, count {}",
            self.username,
            outcome.reason,
            outcome.final_score,
            outcome.final_count
        );
        if outcome.reason.is_bomb() {
            self.audio.play_bomb_effect();
        }

        match self
            .store
            .upsert_best(&self.username, outcome.final_score, outcome.final_count)
        {
            Ok(true) => log::info!("New best for {}", self.username),
            Ok(false) => {}
            Err(e) => log::warn!("Failed to save score for {}: {}", self.username, e),
        }

        let (title, message, severity) = game_over_notice(&outcome);
        self.ui.notify_game_over(title, &message, severity);
        self.ui.request_return_to_menu();
        self.audio.stop_all();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn outcome(&self) -> Option<SessionEnded> {
        self.state.outcome
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
