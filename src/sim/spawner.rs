//! Obstacle spawning
//!
//! New pairs enter at the spawn edge (right side of the field) with a gap
//! center picked uniformly from the configured margin range.

use rand::Rng;

use super::state::{GameEvent, GameState, ObstaclePair};

/// Pick a gap center in `[margin, field_height - margin]` (inclusive)
pub fn roll_gap_center<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    rng.random_range(min..=max)
}

/// Add a pair at the spawn edge with a random gap center
///
/// No-op once the run is over. Returns the chosen center when a pair was
/// spawned.
pub fn spawn(state: &mut GameState) -> Option<u32> {
    if !state.is_playing() {
        return None;
    }
    let (min, max) = state.config.gap_center_range();
    let gap_center = roll_gap_center(&mut state.rng, min, max);
    spawn_with_center(state, gap_center);
    Some(gap_center)
}

/// Add a pair at the spawn edge around a known gap center
pub fn spawn_with_center(state: &mut GameState, gap_center: u32) {
    let pair = ObstaclePair::new(state.config.field_width, gap_center as f32, &state.config);
    log::debug!(
        "Spawned obstacle pair: gap center {}, lower {:.0}, upper {:.0}",
        gap_center,
        pair.lower.size.y,
        pair.upper.size.y
    );
    state.obstacles.push(pair);
    state.push_event(GameEvent::Spawned { gap_center });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{FailureCause, GamePhase};
    use proptest::prelude::*;

    #[test]
    fn test_spawn_with_center_geometry() {
        let config = GameConfig::default();
        let mut state = GameState::new(config, 3).unwrap();
        spawn_with_center(&mut state, 300);
        let pair = &state.obstacles[0];
        assert_eq!(pair.lower.size.y, 210.0);
        assert_eq!(pair.upper.size.y, 250.0);
        assert_eq!(pair.lower.pos.x, 360.0);
        assert_eq!(pair.upper.pos.x, 360.0);
        assert_eq!(pair.lower.pos.y, 0.0);
        assert_eq!(pair.upper.pos.y, 390.0);
        assert_eq!(pair.lower.size.x, 80.0);
        assert!(!pair.passed);
    }

    #[test]
    fn test_spawn_emits_event() {
        let mut state = GameState::new(GameConfig::default(), 3).unwrap();
        state.drain_events();
        let center = spawn(&mut state).unwrap();
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Spawned { gap_center: center }]
        );
    }

    #[test]
    fn test_spawn_is_noop_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), 3).unwrap();
        state.end_run(FailureCause::Collision);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(spawn(&mut state), None);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = GameState::new(GameConfig::default(), 42).unwrap();
        let mut b = GameState::new(GameConfig::default(), 42).unwrap();
        for _ in 0..20 {
            assert_eq!(spawn(&mut a), spawn(&mut b));
        }
    }

    proptest! {
        #[test]
        fn prop_spawned_pairs_fill_the_field(seed in any::<u64>(), height in 440.0f32..2000.0) {
            let config = GameConfig::default().with_field(360.0, height);
            let mut state = GameState::new(config, seed).unwrap();
            let gap = state.config.pipe_gap;
            for _ in 0..8 {
                let center = spawn(&mut state).unwrap();
                prop_assert!(center >= 200);
                prop_assert!(center as f32 <= height - 200.0);

                let pair = state.obstacles.last().unwrap();
                let total = pair.upper.size.y + gap + pair.lower.size.y;
                prop_assert!((total - height).abs() < 1e-2);
                prop_assert!(pair.lower.size.y >= 0.0);
                prop_assert!(pair.upper.size.y >= 0.0);
                prop_assert_eq!(pair.lower.pos.x, pair.upper.pos.x);
            }
        }
    }
}
