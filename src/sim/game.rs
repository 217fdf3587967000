//! A running session: game state plus the clock that drives it

use super::clock::{FixedClock, Step};
use super::spawner;
use super::state::{GameEvent, GameState};
use super::tick::{self, Command};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::view::Frame;

#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    clock: FixedClock,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let state = GameState::new(config, seed)?;
        let clock = FixedClock::from_config(&state.config);
        log::info!(
            "New session: field {}x{}, seed {}",
            state.config.field_width,
            state.config.field_height,
            seed
        );
        Ok(Self { state, clock })
    }

    /// Run whatever physics and spawn steps are due after `frame_dt` seconds
    ///
    /// Returns the number of physics ticks that ran.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = self.clock.tick_dt();
        let mut ticks = 0;
        for step in self.clock.advance(frame_dt) {
            match step {
                Step::Physics => {
                    tick::tick(&mut self.state, dt);
                    ticks += 1;
                }
                Step::Spawn => {
                    spawner::spawn(&mut self.state);
                }
            }
        }
        ticks
    }

    /// Player pressed the one button
    pub fn primary_action(&mut self) -> Command {
        let command = tick::primary_action(&mut self.state);
        if command == Command::Reset {
            self.clock.reset();
        }
        command
    }

    /// Restart with new field dimensions or tuning
    ///
    /// The current session is left untouched if `config` is invalid.
    pub fn restart_with(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.clock = FixedClock::from_config(&config);
        self.state.config = config;
        self.state.reset();
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{FailureCause, GamePhase};

    #[test]
    fn test_first_spawn_after_two_seconds() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        for _ in 0..119 {
            // Keep the actor alive
            game.state.actor.body.pos.y = 320.0;
            game.advance(SIM_DT);
        }
        assert!(game.state.obstacles.is_empty());
        game.advance(SIM_DT);
        assert_eq!(game.state.obstacles.len(), 1);
        assert_eq!(game.state.obstacles[0].lower.pos.x, FIELD_WIDTH);
    }

    #[test]
    fn test_no_spawns_while_game_over() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        game.state.end_run(FailureCause::Collision);
        for _ in 0..300 {
            game.advance(SIM_DT);
        }
        assert!(game.state.obstacles.is_empty());
        assert_eq!(game.state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_advance_reports_ticks() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        assert_eq!(game.advance(0.05), 3);
    }

    #[test]
    fn test_reset_restarts_spawn_clock() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        for _ in 0..100 {
            game.state.actor.body.pos.y = 320.0;
            game.advance(SIM_DT);
        }
        game.state.end_run(FailureCause::OutOfBounds);
        assert_eq!(game.primary_action(), Command::Reset);

        for _ in 0..60 {
            game.state.actor.body.pos.y = 320.0;
            game.advance(SIM_DT);
        }
        // Old timer would have fired at tick 120
        assert!(game.state.obstacles.is_empty());
    }

    #[test]
    fn test_restart_with_new_field() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        game.restart_with(GameConfig::default().with_field(480.0, 800.0))
            .unwrap();
        assert_eq!(game.state.actor.pos().y, 400.0);
        assert_eq!(game.frame().field, [480.0, 800.0]);

        let err = game.restart_with(GameConfig::default().with_field(-1.0, 800.0));
        assert!(err.is_err());
        assert_eq!(game.state.config.field_width, 480.0);
    }

    #[test]
    fn test_full_session_flow() {
        let mut game = Game::new(GameConfig::default(), 7).unwrap();
        assert_eq!(game.drain_events(), vec![GameEvent::AmbientStart]);

        // No input: the actor drops out of the field within a second
        for _ in 0..120 {
            game.advance(SIM_DT);
        }
        assert_eq!(game.state.phase, GamePhase::GameOver);
        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::AmbientStop,
                GameEvent::Failure {
                    cause: FailureCause::OutOfBounds
                }
            ]
        );
        assert_eq!(game.frame().message, GAME_OVER_MESSAGE);

        assert_eq!(game.primary_action(), Command::Reset);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Reset, GameEvent::AmbientStart]
        );
        assert_eq!(game.frame().message, "");
        assert_eq!(game.frame().score_text, "0");
    }
}
