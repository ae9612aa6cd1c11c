//! Lasso grapple: cast, extend, hook, retract, attach
//!
//! One grapple per player. A cast starts only from `Idle` with empty hands.
//! The aim angle is fixed for the whole cast while the origin follows the
//! player center, so the tip moves with the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{CollectibleKind, EndReason, GameEvent, GameState, SessionEnded};
use crate::consts::LASSO_TIP_SIZE;
use crate::{angle_between, direction_from_angle};

/// Grapple phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrapplePhase {
    #[default]
    Idle,
    Extending,
    Retracting,
}

/// Transient lasso state, reset after every full retraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grapple {
    pub phase: GrapplePhase,
    /// Current extended length
    pub length: f32,
    /// Distance from player center to the aim point at activation
    pub target_length: f32,
    /// +1 while extending, -1 while retracting
    pub direction: i8,
    /// Aim angle (radians), fixed per cast
    pub angle: f32,
    /// Collectible hooked on this cast
    pub caught: Option<u32>,
}

impl Default for Grapple {
    fn default() -> Self {
        Self {
            phase: GrapplePhase::Idle,
            length: 0.0,
            target_length: 0.0,
            direction: 1,
            angle: 0.0,
            caught: None,
        }
    }
}

impl Grapple {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == GrapplePhase::Idle
    }

    /// Start a cast from `origin` toward `aim`. Returns false unless idle.
    pub fn activate(&mut self, origin: Vec2, aim: Vec2) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.target_length = origin.distance(aim);
        self.angle = angle_between(origin, aim);
        self.length = 0.0;
        self.direction = 1;
        self.caught = None;
        self.phase = GrapplePhase::Extending;
        true
    }

    /// Tip position for a given origin
    pub fn tip(&self, origin: Vec2) -> Vec2 {
        origin + direction_from_angle(self.angle) * self.length
    }

    /// Probe box around the tip
    pub fn tip_bounds(&self, origin: Vec2) -> Aabb {
        Aabb::centered(self.tip(origin), Vec2::splat(LASSO_TIP_SIZE))
    }

    fn start_retracting(&mut self) {
        self.phase = GrapplePhase::Retracting;
        self.direction = -1;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What happened to a hooked collectible once the lasso was fully retracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Nothing was hooked
    Empty,
    /// Bomb reached an invincible player and was discarded
    BombDefused,
    /// Star consumed for points and bonus effects
    BonusCollected { points: u32 },
    /// Normal orb now carried by the player
    Held { id: u32 },
    /// Bomb reached a vulnerable player
    Ended(SessionEnded),
}

/// Result of one grapple tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrappleStep {
    /// No cast in flight
    Idle,
    Extending,
    /// Hooked a collectible this tick; now retracting
    Caught { id: u32 },
    Retracting,
    /// Fully retracted this tick; back to idle
    Retracted(AttachOutcome),
}

/// Start a cast at `aim` if the grapple is idle and the player's hands are empty.
///
/// Requests that arrive mid-cast or while holding are ignored.
pub fn try_cast(state: &mut GameState, aim: Vec2) -> bool {
    if !state.grapple.is_idle() {
        log::debug!("Cast ignored: grapple already {:?}", state.grapple.phase);
        return false;
    }
    if state.held.is_some() {
        log::debug!("Cast ignored: player is holding an item");
        return false;
    }
    let origin = state.player.center();
    state.grapple.activate(origin, aim)
}

/// Advance the grapple by one tick
pub fn advance_grapple(state: &mut GameState) -> GrappleStep {
    match state.grapple.phase {
        GrapplePhase::Idle => GrappleStep::Idle,
        GrapplePhase::Extending => extend(state),
        GrapplePhase::Retracting => retract(state),
    }
}

fn extend(state: &mut GameState) -> GrappleStep {
    let step = state.tuning.lasso_speed;
    let grapple = &mut state.grapple;
    grapple.length = (grapple.length + step).min(grapple.target_length);

    // A zero-length cast has no reach and never hooks anything
    if state.grapple.target_length > 0.0 {
        if let Some(id) = hook_at_tip(state) {
            state.grapple.start_retracting();
            return GrappleStep::Caught { id };
        }
    }

    if state.grapple.length >= state.grapple.target_length {
        state.grapple.start_retracting();
        if state.grapple.length <= 0.0 {
            return GrappleStep::Retracted(finish_retraction(state));
        }
        return GrappleStep::Retracting;
    }
    GrappleStep::Extending
}

fn retract(state: &mut GameState) -> GrappleStep {
    let step = state.tuning.lasso_speed;
    let grapple = &mut state.grapple;
    grapple.length = (grapple.length - step).max(0.0);

    // An empty lasso still hooks whatever crosses the tip on the way back
    let hooked = match state.grapple.caught {
        None => hook_at_tip(state),
        Some(_) => None,
    };

    if state.grapple.length > 0.0 {
        return match hooked {
            Some(id) => GrappleStep::Caught { id },
            None => GrappleStep::Retracting,
        };
    }
    GrappleStep::Retracted(finish_retraction(state))
}

/// Hook the first Free collectible under the tip, in store order
fn hook_at_tip(state: &mut GameState) -> Option<u32> {
    let origin = state.player.center();
    let probe = state.grapple.tip_bounds(origin);
    let tip = state.grapple.tip(origin);
    let (id, kind) = state
        .collectibles
        .iter()
        .find(|c| c.is_free() && !state.is_removed(c.id) && probe.intersects(&c.bounds()))
        .map(|c| (c.id, c.kind))?;

    if let Some(c) = state.get_mut(id) {
        c.begin_pull();
    }
    state.grapple.caught = Some(id);
    state.held_orbit_angle = state.grapple.angle;
    state.events.push(GameEvent::Caught { id, kind, tip });
    log::debug!("Lasso hooked {:?} #{} at ({:.0}, {:.0})", kind, id, tip.x, tip.y);
    Some(id)
}

fn finish_retraction(state: &mut GameState) -> AttachOutcome {
    let caught = state.grapple.caught.take();
    state.grapple.reset();
    match caught {
        Some(id) => attach(state, id),
        None => AttachOutcome::Empty,
    }
}

/// Resolve a hooked collectible that has reached the player
fn attach(state: &mut GameState, id: u32) -> AttachOutcome {
    let Some(kind) = state.get(id).map(|c| c.kind) else {
        log::warn!("Hooked collectible #{} vanished before attach", id);
        return AttachOutcome::Empty;
    };

    match kind {
        CollectibleKind::Bomb => {
            state.mark_removed(id);
            if state.player.invincible {
                log::info!("Lassoed bomb #{} discarded, player is invincible", id);
                state.events.push(GameEvent::BombDefused { id });
                AttachOutcome::BombDefused
            } else {
                log::info!("Lassoed bomb #{} exploded at the player", id);
                AttachOutcome::Ended(state.end(EndReason::BombAttached))
            }
        }
        CollectibleKind::BonusStar { value } => {
            let points = value.saturating_mul(state.tuning.bonus_point_multiplier);
            let (bonus, max) = (
                state.tuning.bonus_duration_ticks,
                state.tuning.max_bonus_duration_ticks,
            );
            state.player.add_score(points);
            state.player.grant_bonus(bonus, max);
            state.mark_removed(id);
            state.events.push(GameEvent::BonusCollected { points });
            log::info!(
                "Bonus star collected: +{} points, boost {} / invincible {} ticks",
                points,
                state.player.speed_boost_ticks,
                state.player.invincibility_ticks
            );
            AttachOutcome::BonusCollected { points }
        }
        CollectibleKind::Normal { .. } => {
            if let Some(c) = state.get_mut(id) {
                c.attach_to_player();
            }
            state.held = Some(id);
            log::debug!("Orb #{} attached to player", id);
            AttachOutcome::Held { id }
        }
    }
}

/// Where a hooked collectible should be drawn: centered on the lasso tip
pub fn pulled_item_position(state: &GameState) -> Option<Vec2> {
    let id = state.grapple.caught?;
    let item = state.get(id)?;
    let tip = state.grapple.tip(state.player.center());
    Some(tip - Vec2::splat(item.size / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CaptureState, Collectible, GamePhase, Heading};
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(3, Tuning::default(), Vec2::new(800.0, 600.0));
        state.start();
        // Center at (132.5, 132.5)
        state.player.pos = Vec2::new(100.0, 100.0);
        state
    }

    fn add(state: &mut GameState, pos: Vec2, kind: CollectibleKind) -> u32 {
        let id = state.next_entity_id();
        state.insert(Collectible::new(id, pos, 40.0, kind, 3.0, Heading::Right));
        id
    }

    /// Advance until the grapple is idle again, returning the final step
    fn run_cast(state: &mut GameState) -> GrappleStep {
        for _ in 0..1000 {
            let step = advance_grapple(state);
            if let GrappleStep::Retracted(_) = step {
                return step;
            }
        }
        panic!("grapple never retracted");
    }

    #[test]
    fn test_activation_sets_target_and_angle() {
        let mut state = running_state();
        assert!(try_cast(&mut state, Vec2::new(132.5, 232.5)));
        let g = &state.grapple;
        assert_eq!(g.phase, GrapplePhase::Extending);
        assert_eq!(g.length, 0.0);
        assert!((g.target_length - 100.0).abs() < 1e-4);
        assert!((g.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(g.direction, 1);
    }

    #[test]
    fn test_second_cast_is_ignored() {
        let mut state = running_state();
        assert!(try_cast(&mut state, Vec2::new(500.0, 132.5)));
        advance_grapple(&mut state);
        let before = state.grapple.clone();
        assert!(!try_cast(&mut state, Vec2::new(0.0, 0.0)));
        assert_eq!(state.grapple.angle, before.angle);
        assert_eq!(state.grapple.length, before.length);
    }

    #[test]
    fn test_cast_blocked_while_holding() {
        let mut state = running_state();
        state.held = Some(99);
        assert!(!try_cast(&mut state, Vec2::new(500.0, 132.5)));
        assert!(state.grapple.is_idle());
    }

    #[test]
    fn test_empty_cast_extends_then_retracts() {
        let mut state = running_state();
        try_cast(&mut state, Vec2::new(157.5, 132.5)); // 25px to the right
        assert_eq!(advance_grapple(&mut state), GrappleStep::Extending);
        assert_eq!(state.grapple.length, 10.0);
        assert_eq!(advance_grapple(&mut state), GrappleStep::Extending);
        // Clamped to target, no hit
        assert_eq!(advance_grapple(&mut state), GrappleStep::Retracting);
        assert_eq!(state.grapple.length, 25.0);
        assert_eq!(state.grapple.direction, -1);
        assert_eq!(advance_grapple(&mut state), GrappleStep::Retracting);
        assert_eq!(advance_grapple(&mut state), GrappleStep::Retracting);
        assert_eq!(
            advance_grapple(&mut state),
            GrappleStep::Retracted(AttachOutcome::Empty)
        );
        assert!(state.grapple.is_idle());
        assert_eq!(state.grapple.length, 0.0);
        assert_eq!(state.grapple.direction, 1);
    }

    #[test]
    fn test_zero_length_cast_returns_to_idle_at_once() {
        let mut state = running_state();
        // An orb sitting right on the player center is still not hooked
        let id = add(&mut state, Vec2::new(112.5, 112.5), CollectibleKind::Normal { value: 5 });
        let center = state.player.center();
        try_cast(&mut state, center);
        assert_eq!(
            advance_grapple(&mut state),
            GrappleStep::Retracted(AttachOutcome::Empty)
        );
        assert!(state.grapple.is_idle());
        assert_eq!(state.get(id).map(|c| c.capture()), Some(CaptureState::Free));
    }

    #[test]
    fn test_hook_marks_being_pulled_and_reports_tip() {
        let mut state = running_state();
        // Tip reaches x = 172.5 after 4 ticks; orb spans 170..210
        let id = add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Normal { value: 7 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));

        let mut step = GrappleStep::Idle;
        for _ in 0..4 {
            step = advance_grapple(&mut state);
        }
        assert_eq!(step, GrappleStep::Caught { id });
        assert_eq!(state.grapple.phase, GrapplePhase::Retracting);
        assert_eq!(state.get(id).map(|c| c.capture()), Some(CaptureState::BeingPulled));
        let hooked_at = state.events.iter().find_map(|e| match e {
            GameEvent::Caught { id: caught, tip, .. } if *caught == id => Some(*tip),
            _ => None,
        });
        assert!(hooked_at.is_some_and(|tip| (tip.x - 172.5).abs() < 1e-3));
    }

    #[test]
    fn test_empty_lasso_hooks_on_the_way_back() {
        let mut state = running_state();
        // 40px cast to the right, nothing in the way
        try_cast(&mut state, Vec2::new(172.5, 132.5));
        for _ in 0..3 {
            assert_eq!(advance_grapple(&mut state), GrappleStep::Extending);
        }
        assert_eq!(advance_grapple(&mut state), GrappleStep::Retracting);

        // Drops in after the tip passed; the next retract step puts the tip at x = 162.5
        let id = add(&mut state, Vec2::new(150.0, 120.0), CollectibleKind::Normal { value: 3 });
        assert_eq!(advance_grapple(&mut state), GrappleStep::Caught { id });
        assert_eq!(state.grapple.phase, GrapplePhase::Retracting);
        assert_eq!(state.get(id).map(|c| c.capture()), Some(CaptureState::BeingPulled));

        assert_eq!(run_cast(&mut state), GrappleStep::Retracted(AttachOutcome::Held { id }));
        assert_eq!(state.held, Some(id));
    }

    #[test]
    fn test_loaded_lasso_does_not_hook_again() {
        let mut state = running_state();
        let first = add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Normal { value: 7 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        for _ in 0..4 {
            advance_grapple(&mut state);
        }
        // Sits on the retract path of the loaded lasso
        let second = add(&mut state, Vec2::new(150.0, 120.0), CollectibleKind::Normal { value: 9 });
        let _ = run_cast(&mut state);
        assert_eq!(state.held, Some(first));
        assert_eq!(state.get(second).map(|c| c.capture()), Some(CaptureState::Free));
    }

    #[test]
    fn test_first_match_in_store_order_wins() {
        let mut state = running_state();
        let first = add(&mut state, Vec2::new(150.0, 115.0), CollectibleKind::Normal { value: 1 });
        let second = add(&mut state, Vec2::new(150.0, 115.0), CollectibleKind::Normal { value: 9 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        let _ = run_cast(&mut state);
        assert_eq!(state.held, Some(first));
        assert_eq!(state.get(second).map(|c| c.capture()), Some(CaptureState::Free));
    }

    #[test]
    fn test_normal_becomes_held() {
        let mut state = running_state();
        let id = add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Normal { value: 7 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        assert_eq!(run_cast(&mut state), GrappleStep::Retracted(AttachOutcome::Held { id }));
        assert_eq!(state.held, Some(id));
        assert_eq!(state.get(id).map(|c| c.capture()), Some(CaptureState::HeldByPlayer));
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_bonus_star_extends_and_caps_effects() {
        let mut state = running_state();
        state.player.speed_boost_active = true;
        state.player.speed_boost_ticks = 1700;
        state.player.invincibility_ticks = 100;
        let id = add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::BonusStar { value: 4 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));

        assert_eq!(
            run_cast(&mut state),
            GrappleStep::Retracted(AttachOutcome::BonusCollected { points: 4 })
        );
        assert_eq!(state.player.speed_boost_ticks, 1800);
        assert_eq!(state.player.invincibility_ticks, 700);
        assert!(state.player.invincible && state.player.speed_boost_active);
        assert_eq!(state.player.score, 4);
        assert!(state.is_removed(id));
        assert_eq!(state.held, None);
    }

    #[test]
    fn test_bonus_multiplier_applies() {
        let mut state = running_state();
        state.tuning.bonus_point_multiplier = 2;
        add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::BonusStar { value: 6 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        run_cast(&mut state);
        assert_eq!(state.player.score, 12);
    }

    #[test]
    fn test_lassoed_bomb_ends_session() {
        let mut state = running_state();
        state.player.score = 21;
        add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Bomb);
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        let step = run_cast(&mut state);
        assert!(matches!(
            step,
            GrappleStep::Retracted(AttachOutcome::Ended(SessionEnded {
                reason: EndReason::BombAttached,
                final_score: 21,
                ..
            }))
        ));
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_lassoed_bomb_discarded_when_invincible() {
        let mut state = running_state();
        state.player.invincible = true;
        let id = add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Bomb);
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        assert_eq!(run_cast(&mut state), GrappleStep::Retracted(AttachOutcome::BombDefused));
        assert!(state.is_removed(id));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_pulled_item_rides_the_tip() {
        let mut state = running_state();
        add(&mut state, Vec2::new(170.0, 115.0), CollectibleKind::Normal { value: 2 });
        try_cast(&mut state, Vec2::new(432.5, 132.5));
        for _ in 0..4 {
            advance_grapple(&mut state);
        }
        advance_grapple(&mut state); // retract one step, tip at x = 162.5
        let pos = pulled_item_position(&state).unwrap();
        assert!((pos.x - 142.5).abs() < 1e-3);
        assert!((pos.y - 112.5).abs() < 1e-3);
    }
}
