//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::grapple::Grapple;
use crate::consts::*;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for `start`
    NotStarted,
    /// Ticking
    Running,
    /// Terminal. A new state is created for the next session.
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A free bomb touched the player hitbox
    BombCollision,
    /// A lassoed bomb reached the player
    BombAttached,
    /// A held bomb was carried into the basket
    BombDeposited,
    /// The player quit
    PlayerStopped,
}

impl EndReason {
    pub fn is_bomb(&self) -> bool {
        !matches!(self, EndReason::PlayerStopped)
    }
}

/// Terminal outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnded {
    pub reason: EndReason,
    pub final_score: u32,
    pub final_count: u32,
}

/// Horizontal travel direction, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// What a collectible is. Bombs carry no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Normal { value: u32 },
    Bomb,
    BonusStar { value: u32 },
}

impl CollectibleKind {
    pub fn value(&self) -> u32 {
        match self {
            CollectibleKind::Normal { value } | CollectibleKind::BonusStar { value } => *value,
            CollectibleKind::Bomb => 0,
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self, CollectibleKind::Bomb)
    }
}

/// Who owns a collectible right now.
///
/// Only ever moves forward: Free -> BeingPulled -> HeldByPlayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    /// Drifting across the arena
    Free,
    /// Hooked by the lasso, riding the tip back
    BeingPulled,
    /// Carried by the player toward the basket
    HeldByPlayer,
}

/// An orb, bomb or bonus star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Top-left of the bounding square
    pub pos: Vec2,
    /// Spawn position
    pub origin: Vec2,
    pub size: f32,
    pub kind: CollectibleKind,
    /// Pixels per tick
    pub speed: f32,
    pub heading: Heading,
    capture: CaptureState,
}

impl Collectible {
    pub fn new(
        id: u32,
        pos: Vec2,
        size: f32,
        kind: CollectibleKind,
        speed: f32,
        heading: Heading,
    ) -> Self {
        Self {
            id,
            pos,
            origin: pos,
            size,
            kind,
            speed,
            heading,
            capture: CaptureState::Free,
        }
    }

    #[inline]
    pub fn capture(&self) -> CaptureState {
        self.capture
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.capture == CaptureState::Free
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    /// Move one tick along the heading
    pub fn advance(&mut self) {
        self.pos.x += self.heading.sign() * self.speed;
    }

    /// True once the collectible is fully past the edge it was heading for
    pub fn has_exited(&self, arena_width: f32) -> bool {
        match self.heading {
            Heading::Right => self.pos.x > arena_width + self.size,
            Heading::Left => self.pos.x < -self.size,
        }
    }

    /// Free -> BeingPulled. Returns false (and changes nothing) from any other state.
    pub fn begin_pull(&mut self) -> bool {
        if self.capture != CaptureState::Free {
            return false;
        }
        self.capture = CaptureState::BeingPulled;
        true
    }

    /// BeingPulled -> HeldByPlayer. Returns false (and changes nothing) from any other state.
    pub fn attach_to_player(&mut self) -> bool {
        if self.capture != CaptureState::BeingPulled {
            return false;
        }
        self.capture = CaptureState::HeldByPlayer;
        true
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the visual box
    pub pos: Vec2,
    pub score: u32,
    pub collected: u32,
    pub invincible: bool,
    pub speed_boost_active: bool,
    pub speed_boost_ticks: u32,
    pub invincibility_ticks: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            score: 0,
            collected: 0,
            invincible: false,
            speed_boost_active: false,
            speed_boost_ticks: 0,
            invincibility_ticks: 0,
        }
    }

    /// Player with the visual box centered in the arena
    pub fn centered_in(arena: Vec2) -> Self {
        Self::new((arena - Vec2::splat(PLAYER_VISUAL_SIZE)) / 2.0)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_VISUAL_SIZE / 2.0)
    }

    /// Pull the visual box back inside `[0, arena - PLAYER_VISUAL_SIZE]`
    pub fn clamp_to_arena(&mut self, arena: Vec2) {
        let max = (arena - Vec2::splat(PLAYER_VISUAL_SIZE)).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Full visual box (used for the basket)
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PLAYER_VISUAL_SIZE))
    }

    /// Reduced box centered in the visual box (used for bombs)
    pub fn hitbox(&self) -> Aabb {
        let inset = (PLAYER_VISUAL_SIZE - PLAYER_HITBOX_SIZE) / 2.0;
        Aabb::new(self.pos + Vec2::splat(inset), Vec2::splat(PLAYER_HITBOX_SIZE))
    }

    pub fn current_speed(&self, tuning: &Tuning) -> f32 {
        if self.speed_boost_active {
            tuning.player_boost_speed
        } else {
            tuning.player_base_speed
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_collected(&mut self) {
        self.collected = self.collected.saturating_add(1);
    }

    pub fn decrease_speed_boost(&mut self) {
        self.speed_boost_ticks = self.speed_boost_ticks.saturating_sub(1);
    }

    pub fn decrease_invincibility(&mut self) {
        self.invincibility_ticks = self.invincibility_ticks.saturating_sub(1);
    }

    /// Switch both bonus effects on and extend their remaining time, capped at `max_ticks`
    pub fn grant_bonus(&mut self, ticks: u32, max_ticks: u32) {
        self.speed_boost_active = true;
        self.invincible = true;
        self.speed_boost_ticks = self.speed_boost_ticks.saturating_add(ticks).min(max_ticks);
        self.invincibility_ticks = self.invincibility_ticks.saturating_add(ticks).min(max_ticks);
    }

    pub fn bonus_active(&self) -> bool {
        self.speed_boost_active || self.invincible
    }
}

/// Things that happened during a tick, for the session layer to act on
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The lasso tip hooked a collectible at `tip`
    Caught { id: u32, kind: CollectibleKind, tip: Vec2 },
    /// A star reached the player
    BonusCollected { points: u32 },
    /// Both bonus effects ran out this tick
    BonusExpired,
    /// A bomb was neutralized by invincibility
    BombDefused { id: u32 },
    /// A normal orb landed in the basket
    Deposited { id: u32, points: u32 },
    /// The session reached a terminal state
    Ended(SessionEnded),
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Arena width/height as last reported by the presentation layer
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Ticks processed while running
    pub time_ticks: u64,
    /// Spawn clock
    pub spawn_counter: u64,
    pub player: Player,
    /// Active collectibles in spawn order (first-match tie-breaks follow this order)
    pub collectibles: Vec<Collectible>,
    /// Ids removed this tick, compacted at end of tick
    pending_removal: Vec<u32>,
    pub grapple: Grapple,
    /// Collectible carried by the player
    pub held: Option<u32>,
    /// Angle from player center to where the held item was caught (cosmetic)
    pub held_orbit_angle: f32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Set once, when the session ends
    pub outcome: Option<SessionEnded>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed.
    ///
    /// `tuning` must pass [`Tuning::validate`]; use [`GameState::try_new`]
    /// for values that have not been checked.
    pub fn new(seed: u64, tuning: Tuning, arena: Vec2) -> Self {
        debug_assert!(tuning.validate().is_ok(), "invalid tuning: {:?}", tuning.validate());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            spawn_counter: 0,
            player: Player::centered_in(arena),
            collectibles: Vec::new(),
            pending_removal: Vec::new(),
            grapple: Grapple::default(),
            held: None,
            held_orbit_angle: 0.0,
            events: Vec::new(),
            outcome: None,
            next_id: 1,
        }
    }

    /// Validate `tuning`, then create the state
    pub fn try_new(seed: u64, tuning: Tuning, arena: Vec2) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::new(seed, tuning, arena))
    }

    /// NotStarted -> Running. No effect in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    /// Move to `Ended`, record the outcome and return it.
    ///
    /// Idempotent: a second call returns the first outcome.
    pub fn end(&mut self, reason: EndReason) -> SessionEnded {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let outcome = SessionEnded {
            reason,
            final_score: self.player.score,
            final_count: self.player.collected,
        };
        self.phase = GamePhase::Ended;
        self.outcome = Some(outcome);
        self.events.push(GameEvent::Ended(outcome));
        outcome
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a collectible to the end of the store
    pub fn insert(&mut self, collectible: Collectible) {
        self.collectibles.push(collectible);
    }

    pub fn get(&self, id: u32) -> Option<&Collectible> {
        self.collectibles
            .iter()
            .find(|c| c.id == id && !self.pending_removal.contains(&id))
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Collectible> {
        if self.pending_removal.contains(&id) {
            return None;
        }
        self.collectibles.iter_mut().find(|c| c.id == id)
    }

    /// Schedule removal at end of tick. The entity stops being visible to `get`/`active_count` now.
    pub fn mark_removed(&mut self, id: u32) {
        if !self.pending_removal.contains(&id) {
            self.pending_removal.push(id);
        }
    }

    pub fn is_removed(&self, id: u32) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Collectibles not scheduled for removal
    pub fn active_count(&self) -> usize {
        self.collectibles.len() - self.pending_removal.len()
    }

    /// Drop everything marked for removal, keeping spawn order
    pub fn compact(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }
        let removed = std::mem::take(&mut self.pending_removal);
        self.collectibles.retain(|c| !removed.contains(&c.id));
    }

    /// Basket region for the current arena size
    pub fn basket_bounds(&self) -> Aabb {
        basket_bounds(self.arena)
    }

    /// The collectible the player is carrying
    pub fn held_item(&self) -> Option<&Collectible> {
        self.held.and_then(|id| self.get(id))
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Basket region: centered horizontally, `BASKET_BOTTOM_MARGIN` above the bottom
pub fn basket_bounds(arena: Vec2) -> Aabb {
    Aabb::new(
        Vec2::new(
            arena.x / 2.0 - BASKET_WIDTH / 2.0,
            arena.y - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN,
        ),
        Vec2::new(BASKET_WIDTH, BASKET_HEIGHT),
    )
}
