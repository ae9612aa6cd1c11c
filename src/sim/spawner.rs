//! Collectible spawning at the arena edges
//!
//! Rightward traffic enters from the left in the top half of the arena,
//! leftward traffic enters from the right in the bottom half, so the two
//! streams never share a lane.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleKind, GameState, Heading};
use crate::consts::{SPAWN_BAND_MARGIN, SPAWN_EDGE_OFFSET};
use crate::tuning::Tuning;

/// Spawn a collectible if the interval has elapsed and the arena is below its cap.
///
/// The returned collectible has a fresh id but is not inserted; the caller owns that.
pub fn maybe_spawn(state: &mut GameState, tick_counter: u64) -> Option<Collectible> {
    if tick_counter % state.tuning.spawn_interval.max(1) != 0 {
        return None;
    }
    if state.active_count() >= state.tuning.max_population {
        return None;
    }

    let id = state.next_entity_id();
    let collectible = spawn_collectible(&mut state.rng, id, state.arena, &state.tuning);
    log::debug!(
        "Spawned {:?} #{} heading {:?} at ({:.0}, {:.0})",
        collectible.kind,
        id,
        collectible.heading,
        collectible.pos.x,
        collectible.pos.y
    );
    Some(collectible)
}

/// Build a random collectible just outside one side of the arena
pub fn spawn_collectible<R: Rng>(
    rng: &mut R,
    id: u32,
    arena: Vec2,
    tuning: &Tuning,
) -> Collectible {
    let heading = if rng.random_bool(0.5) {
        Heading::Right
    } else {
        Heading::Left
    };
    let value = rng.random_range(tuning.orb_min_value..=tuning.orb_max_value);
    let kind = kind_for_roll(rng.random::<f64>(), value, tuning);

    let half_height = arena.y / 2.0;
    let band = (half_height - SPAWN_BAND_MARGIN).max(1.0) as u32;
    let lane_y = rng.random_range(0..band) as f32;
    let pos = match heading {
        Heading::Right => Vec2::new(-SPAWN_EDGE_OFFSET, lane_y),
        Heading::Left => Vec2::new(arena.x + SPAWN_EDGE_OFFSET, half_height + lane_y),
    };

    let size = rng.random_range(tuning.orb_min_size..=tuning.orb_max_size) as f32;
    let speed = rng.random_range(tuning.orb_min_speed..=tuning.orb_max_speed) as f32;

    Collectible::new(id, pos, size, kind, speed, heading)
}

/// Map a uniform [0, 1) roll to a kind: bomb band first, then bonus band, then normal
pub fn kind_for_roll(roll: f64, value: u32, tuning: &Tuning) -> CollectibleKind {
    if roll < tuning.bomb_chance {
        CollectibleKind::Bomb
    } else if roll < tuning.bomb_chance + tuning.bonus_chance {
        CollectibleKind::BonusStar { value }
    } else {
        CollectibleKind::Normal { value }
    }
}
