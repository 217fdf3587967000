//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::overlaps;
use super::state::{FailureCause, GameEvent, GamePhase, GameState};

/// What a primary action turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Reset,
}

/// Dispatch the single player input (tap, click, key)
///
/// Jumps while playing, restarts once the run is over.
pub fn primary_action(state: &mut GameState) -> Command {
    match state.phase {
        GamePhase::Playing => {
            state.actor.jump();
            state.push_event(GameEvent::Flap);
            Command::Jump
        }
        GamePhase::GameOver => {
            log::info!("Restarting after game over (score {})", state.score);
            state.reset();
            Command::Reset
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    // Game over freezes the simulation
    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;

    if state.actor.integrate(dt) {
        log::info!("Actor left the field at tick {}", state.time_ticks);
        state.end_run(FailureCause::OutOfBounds);
        return;
    }

    let speed = state.config.pipe_speed;
    let actor_box = state.actor.hitbox();
    let mut hit = false;
    for pair in &mut state.obstacles {
        pair.advance(dt, speed);
        if overlaps(&actor_box, &pair.lower_hitbox()) || overlaps(&actor_box, &pair.upper_hitbox())
        {
            hit = true;
            break;
        }
    }
    if hit {
        log::info!(
            "Collision at tick {} with score {}",
            state.time_ticks,
            state.score
        );
        state.end_run(FailureCause::Collision);
        return;
    }

    // Trailing edge against the actor's left edge
    let actor_x = state.actor.pos().x;
    let mut cleared = 0;
    for pair in &mut state.obstacles {
        if !pair.passed && pair.trailing_edge() < actor_x {
            pair.passed = true;
            cleared += 1;
        }
    }
    for _ in 0..cleared {
        state.score += 1;
        let score = state.score;
        state.push_event(GameEvent::Scored { score });
    }

    state.obstacles.retain(|p| !p.is_offscreen());
}
