//! Idle/demo mode - a simple controller that plays the game
//!
//! Aims for the center of the next gap the actor has not cleared yet and
//! flaps whenever the predicted height drops below it.

use super::state::GameState;

/// How far ahead (seconds) to extrapolate the actor's fall
const LOOKAHEAD: f32 = 0.12;
/// Aim this far below the gap center; the jump arc carries the actor up
const AIM_BIAS: f32 = 25.0;

/// Height the controller is currently steering toward
pub fn target_height(state: &GameState) -> f32 {
    let actor_left = state.actor.pos().x;
    state
        .obstacles
        .iter()
        .find(|p| !p.passed && p.trailing_edge() >= actor_left)
        .map(|p| p.gap_center() - AIM_BIAS)
        .unwrap_or(state.config.field_height / 2.0)
}

/// Should the autopilot press the button this tick?
pub fn wants_flap(state: &GameState) -> bool {
    if !state.is_playing() {
        return false;
    }
    let actor = &state.actor;
    let center_y = actor.body.center().y;
    let predicted = center_y + actor.velocity * LOOKAHEAD;
    actor.velocity <= 0.0 && predicted < target_height(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::spawner::spawn_with_center;
    use crate::sim::state::FailureCause;

    #[test]
    fn test_targets_field_center_when_clear() {
        let state = GameState::new(GameConfig::default(), 1).unwrap();
        assert_eq!(target_height(&state), 320.0);
    }

    #[test]
    fn test_targets_next_gap() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        spawn_with_center(&mut state, 420);
        assert_eq!(target_height(&state), 420.0 - AIM_BIAS);
    }

    #[test]
    fn test_flaps_when_falling_below_target() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.actor.body.pos.y = 100.0;
        state.actor.velocity = -50.0;
        assert!(wants_flap(&state));

        // Already rising
        state.actor.velocity = 200.0;
        assert!(!wants_flap(&state));

        // High above the target
        state.actor.body.pos.y = 550.0;
        state.actor.velocity = -10.0;
        assert!(!wants_flap(&state));
    }

    #[test]
    fn test_idle_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.actor.body.pos.y = 10.0;
        state.end_run(FailureCause::OutOfBounds);
        assert!(!wants_flap(&state));
    }
}
