//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Order within a
//! running tick: input -> collision sweep -> effect decay -> spawn -> grapple ->
//! basket check -> compaction.

use glam::Vec2;

use super::collision::{ResolveOutcome, resolve_free_collectibles};
use super::deposit::check_basket;
use super::grapple::{advance_grapple, try_cast};
use super::spawner::maybe_spawn;
use super::state::{CollectibleKind, EndReason, GameEvent, GameState, SessionEnded};
use crate::consts::PLAYER_VISUAL_SIZE;

/// Cardinal movement input (no diagonals)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub fn vector(&self) -> Vec2 {
        match self {
            MoveDirection::Up => Vec2::new(0.0, -1.0),
            MoveDirection::Down => Vec2::new(0.0, 1.0),
            MoveDirection::Left => Vec2::new(-1.0, 0.0),
            MoveDirection::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current viewport size; keeps the last known size when `None`
    pub arena_size: Option<Vec2>,
    /// One movement step this tick
    pub movement: Option<MoveDirection>,
    /// Grapple activation with aim point in arena coordinates
    pub cast_at: Option<Vec2>,
    /// Player quits
    pub stop: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed tick.
///
/// Returns the outcome on the tick the session ends; `None` otherwise,
/// including every call made outside the running phase.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<SessionEnded> {
    if !state.is_running() {
        return None;
    }

    if let Some(size) = input.arena_size {
        state.arena = size;
        state.player.clamp_to_arena(size);
    }

    if input.stop {
        log::info!("Session stopped by player");
        return Some(state.end(EndReason::PlayerStopped));
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if let Some(direction) = input.movement {
        move_player(state, direction);
    }
    if let Some(aim) = input.cast_at {
        try_cast(state, aim);
    }

    state.time_ticks += 1;

    if let ResolveOutcome::Ended(outcome) = resolve_free_collectibles(state) {
        state.compact();
        return Some(outcome);
    }

    decay_effects(state);

    state.spawn_counter += 1;
    let spawn_counter = state.spawn_counter;
    if let Some(collectible) = maybe_spawn(state, spawn_counter) {
        state.insert(collectible);
    }

    advance_grapple(state);
    if !state.is_running() {
        state.compact();
        return state.outcome;
    }

    check_basket(state);
    state.compact();
    if !state.is_running() {
        return state.outcome;
    }
    None
}

/// Step the player one `current_speed` in `direction`.
///
/// A step that would leave the arena on an axis is dropped, not clamped.
pub fn move_player(state: &mut GameState, direction: MoveDirection) {
    let speed = state.player.current_speed(&state.tuning);
    let next = state.player.pos + direction.vector() * speed;
    let max = state.arena - Vec2::splat(PLAYER_VISUAL_SIZE);

    if next.x >= 0.0 && next.x <= max.x {
        state.player.pos.x = next.x;
    }
    if next.y >= 0.0 && next.y <= max.y {
        state.player.pos.y = next.y;
    }
}

/// Count down bonus effects, switching each off when it runs out
pub fn decay_effects(state: &mut GameState) {
    let was_active = state.player.bonus_active();
    let player = &mut state.player;

    if player.speed_boost_active {
        player.decrease_speed_boost();
        if player.speed_boost_ticks == 0 {
            player.speed_boost_active = false;
            log::info!("Speed boost ended");
        }
    }
    if player.invincible {
        player.decrease_invincibility();
        if player.invincibility_ticks == 0 {
            player.invincible = false;
            log::info!("Invincibility ended");
        }
    }

    if was_active && !state.player.bonus_active() {
        state.events.push(GameEvent::BonusExpired);
    }
}

/// Bombs closer than this (center to center) make the autopilot sidestep
const AUTOPILOT_BOMB_RADIUS: f32 = 110.0;

/// Fill in movement and cast input from the current state
fn autopilot(state: &GameState, input: &mut TickInput) {
    let center = state.player.center();

    // Sidestep the nearest free bomb unless invincible
    if !state.player.invincible {
        let threat = state
            .collectibles
            .iter()
            .filter(|c| c.is_free() && c.kind.is_bomb() && !state.is_removed(c.id))
            .map(|c| c.bounds().center())
            .filter(|p| p.distance(center) < AUTOPILOT_BOMB_RADIUS)
            .min_by(|a, b| {
                a.distance(center)
                    .partial_cmp(&b.distance(center))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(bomb) = threat {
            // Lanes are horizontal, so vertical escape clears them fastest
            let away = if bomb.y >= center.y {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            };
            input.movement = Some(away);
            return;
        }
    }

    if state.held.is_some() {
        input.movement = step_toward(center, state.basket_bounds().center());
        return;
    }

    if state.grapple.is_idle() && input.cast_at.is_none() {
        // Prefer stars, then the most valuable reachable orb
        let target = state
            .collectibles
            .iter()
            .filter(|c| c.is_free() && !c.kind.is_bomb() && !state.is_removed(c.id))
            .filter(|c| c.pos.x >= 0.0 && c.pos.x + c.size <= state.arena.x)
            .max_by_key(|c| match c.kind {
                CollectibleKind::BonusStar { value } => 100 + value,
                other => other.value(),
            });
        if let Some(target) = target {
            // Lead the target by the time the lasso needs to get there
            let aim = target.bounds().center();
            let ticks = aim.distance(center) / state.tuning.lasso_speed.max(1.0);
            let lead = Vec2::new(target.heading.sign() * target.speed * ticks, 0.0);
            input.cast_at = Some(aim + lead);
        }
    }
}

/// Greedy cardinal step, larger axis first
fn step_toward(from: Vec2, to: Vec2) -> Option<MoveDirection> {
    let d = to - from;
    if d.length_squared() < 1.0 {
        return None;
    }
    Some(if d.x.abs() >= d.y.abs() {
        if d.x > 0.0 {
            MoveDirection::Right
        } else {
            MoveDirection::Left
        }
    } else if d.y > 0.0 {
        MoveDirection::Down
    } else {
        MoveDirection::Up
    })
}
