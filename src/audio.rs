//! Audio cues
//!
//! The session only states intent (start this loop, play that effect). How the
//! intent is voiced is up to the [`AudioCues`] implementation. [`AudioManager`]
//! is the headless one: it tracks which loops are playing, applies the volume
//! settings and logs each cue.

use crate::settings::Settings;

/// Looping tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loop {
    /// Plays for the whole session
    Background,
    /// Replaces the background while a bonus is active
    Bonus,
}

/// One-shot effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bomb went off
    Bomb,
}

/// Audio intents raised by the session. Starting a playing loop or stopping a
/// silent one does nothing.
pub trait AudioCues {
    fn start_loop(&mut self, track: Loop);
    fn stop_loop(&mut self, track: Loop);
    fn play(&mut self, effect: SoundEffect);

    fn start_background(&mut self) {
        self.start_loop(Loop::Background);
    }

    fn stop_background(&mut self) {
        self.stop_loop(Loop::Background);
    }

    fn play_bonus_loop(&mut self) {
        self.start_loop(Loop::Bonus);
    }

    fn stop_bonus_loop(&mut self) {
        self.stop_loop(Loop::Bonus);
    }

    fn play_bomb_effect(&mut self) {
        self.play(SoundEffect::Bomb);
    }

    /// Silence every loop
    fn stop_all(&mut self) {
        self.stop_loop(Loop::Bonus);
        self.stop_loop(Loop::Background);
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    background_playing: bool,
    bonus_playing: bool,
    effects_played: u32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            background_playing: false,
            bonus_playing: false,
            effects_played: 0,
        }
    }

    /// Audio manager using the volume settings from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_playing(&self, track: Loop) -> bool {
        match track {
            Loop::Background => self.background_playing,
            Loop::Bonus => self.bonus_playing,
        }
    }

    /// One-shot effects played so far
    pub fn effects_played(&self) -> u32 {
        self.effects_played
    }

    /// Effective volume for music
    pub fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Effective volume for effects
    pub fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn slot(&mut self, track: Loop) -> &mut bool {
        match track {
            Loop::Background => &mut self.background_playing,
            Loop::Bonus => &mut self.bonus_playing,
        }
    }
}

impl AudioCues for AudioManager {
    fn start_loop(&mut self, track: Loop) {
        let level = self.music_level();
        let playing = self.slot(track);
        if *playing {
            return;
        }
        *playing = true;
        log::debug!("Loop {:?} started (volume {:.2})", track, level);
    }

    fn stop_loop(&mut self, track: Loop) {
        let playing = self.slot(track);
        if !*playing {
            return;
        }
        *playing = false;
        log::debug!("Loop {:?} stopped", track);
    }

    fn play(&mut self, effect: SoundEffect) {
        let vol = self.sfx_level();
        self.effects_played += 1;
        if vol <= 0.0 {
            return;
        }
        log::debug!("Effect {:?} (volume {:.2})", effect, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loops_are_idempotent() {
        let mut audio = AudioManager::new();
        audio.start_background();
        audio.start_background();
        assert!(audio.is_playing(Loop::Background));
        audio.stop_background();
        assert!(!audio.is_playing(Loop::Background));
        audio.stop_background();
        assert!(!audio.is_playing(Loop::Background));
    }

    #[test]
    fn test_stop_all() {
        let mut audio = AudioManager::new();
        audio.start_background();
        audio.play_bonus_loop();
        audio.stop_all();
        assert!(!audio.is_playing(Loop::Background));
        assert!(!audio.is_playing(Loop::Bonus));
    }

    #[test]
    fn test_volume_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 2.0,
            ..Settings::default()
        };
        let audio = AudioManager::from_settings(&settings);
        assert_eq!(audio.music_level(), 0.25);
        assert_eq!(audio.sfx_level(), 0.5);

        let muted = AudioManager::from_settings(&Settings {
            muted: true,
            ..Settings::default()
        });
        assert_eq!(muted.music_level(), 0.0);
        assert_eq!(muted.sfx_level(), 0.0);
    }

    #[test]
    fn test_effects_counted_even_when_muted() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        audio.play_bomb_effect();
        assert_eq!(audio.effects_played(), 1);
    }
}
