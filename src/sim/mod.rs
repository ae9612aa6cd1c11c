//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No presentation, audio or storage dependencies

pub mod collision;
pub mod deposit;
pub mod grapple;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ResolveOutcome, resolve_free_collectibles};
pub use deposit::{DepositOutcome, check_basket, try_deposit};
pub use grapple::{
    AttachOutcome, Grapple, GrapplePhase, GrappleStep, advance_grapple, pulled_item_position,
    try_cast,
};
pub use spawner::{maybe_spawn, spawn_collectible};
pub use state::{
    CaptureState, Collectible, CollectibleKind, EndReason, GameEvent, GamePhase, GameState, Heading,
    Player, SessionEnded, basket_bounds,
};
pub use tick::{MoveDirection, TickInput, move_player, tick};
