//! Collision detection and the per-tick lifecycle sweep
//!
//! Everything is axis-aligned boxes. The sweep moves free collectibles,
//! checks free bombs against the player hitbox and prunes whatever has left
//! the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EndReason, GameEvent, GameState, SessionEnded};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Overlap with positive area. Touching edges do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }
}

/// Result of one resolver pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// All free collectibles processed
    Completed,
    /// A bomb hit the player; the rest of the pass was skipped
    Ended(SessionEnded),
}

/// Move free collectibles, resolve free bombs against the player, prune exits.
///
/// Reads the arena width from `state` each call. Only touches `Free`
/// collectibles. A fatal bomb contact ends the session and returns at once,
/// leaving later collectibles unprocessed for this tick.
pub fn resolve_free_collectibles(state: &mut GameState) -> ResolveOutcome {
    let hitbox = state.player.hitbox();
    let arena_width = state.arena.x;

    for idx in 0..state.collectibles.len() {
        let id = state.collectibles[idx].id;
        if state.is_removed(id) || !state.collectibles[idx].is_free() {
            continue;
        }

        let collectible = &mut state.collectibles[idx];
        collectible.advance();

        if collectible.kind.is_bomb() && hitbox.intersects(&collectible.bounds()) {
            if state.player.invincible {
                log::debug!("Bomb {} hit an invincible player, removed", id);
                state.mark_removed(id);
                state.events.push(GameEvent::BombDefused { id });
                continue;
            }
            log::info!("Player struck by bomb {}", id);
            return ResolveOutcome::Ended(state.end(EndReason::BombCollision));
        }

        if state.collectibles[idx].has_exited(arena_width) {
            state.mark_removed(id);
        }
    }

    ResolveOutcome::Completed
}
