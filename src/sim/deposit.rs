//! Basket deposits and scoring for held items

use super::collision::Aabb;
use super::state::{CaptureState, Collectible, CollectibleKind, EndReason, GameEvent, GameState};

/// Outcome of a basket check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// No held item; nothing to do
    NothingHeld,
    /// Item is not in `HeldByPlayer` state
    NotHeld,
    /// Player is away from the basket
    NoContact,
    /// Normal orb banked
    Scored { points: u32 },
    /// Star reached the basket (should not happen); dropped without points
    Discarded,
    /// Bomb carried into the basket
    BombDeposited,
}

/// Decide what happens to `held` given where the player and basket are.
///
/// Pure: nothing is mutated.
pub fn try_deposit(held: &Collectible, player_bounds: Aabb, basket_bounds: Aabb) -> DepositOutcome {
    if held.capture() != CaptureState::HeldByPlayer {
        return DepositOutcome::NotHeld;
    }
    if !player_bounds.intersects(&basket_bounds) {
        return DepositOutcome::NoContact;
    }
    match held.kind {
        CollectibleKind::Normal { value } => DepositOutcome::Scored { points: value },
        CollectibleKind::BonusStar { .. } => DepositOutcome::Discarded,
        CollectibleKind::Bomb => DepositOutcome::BombDeposited,
    }
}

/// Run the basket check against the live state and apply the result
pub fn check_basket(state: &mut GameState) -> DepositOutcome {
    let Some(id) = state.held else {
        return DepositOutcome::NothingHeld;
    };
    let Some(held) = state.get(id) else {
        log::warn!("Held item #{} is missing from the store, releasing it", id);
        state.held = None;
        return DepositOutcome::NothingHeld;
    };

    let outcome = try_deposit(held, state.player.bounds(), state.basket_bounds());
    match outcome {
        DepositOutcome::NothingHeld | DepositOutcome::NoContact => {}
        DepositOutcome::NotHeld => {
            log::warn!("Held reference #{} points at an item that is not held", id);
        }
        DepositOutcome::Scored { points } => {
            state.player.add_score(points);
            state.player.add_collected();
            state.held = None;
            state.held_orbit_angle = 0.0;
            state.mark_removed(id);
            state.events.push(GameEvent::Deposited { id, points });
            log::info!(
                "Orb deposited: +{} (score {}, collected {})",
                points,
                state.player.score,
                state.player.collected
            );
        }
        DepositOutcome::Discarded => {
            log::warn!("Bonus star #{} reached the basket while held; discarded", id);
            state.held = None;
            state.held_orbit_angle = 0.0;
            state.mark_removed(id);
        }
        DepositOutcome::BombDeposited => {
            log::info!("Bomb #{} brought to the basket", id);
            state.held = None;
            state.mark_removed(id);
            state.end(EndReason::BombDeposited);
        }
    }
    outcome
}
