//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::GameConfig;
use crate::consts::GAME_OVER_MESSAGE;
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a tap to restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// Fell through the bottom of the field
    OutOfBounds,
    /// Hit an obstacle
    Collision,
}

/// Signals for the host (audio, HUD, logging), drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Start the looping background cue
    AmbientStart,
    /// Stop the looping background cue
    AmbientStop,
    /// Run ended; play the one-shot failure cue
    Failure { cause: FailureCause },
    /// Actor jumped
    Flap,
    /// An obstacle pair was cleared
    Scored { score: u32 },
    /// A new obstacle pair entered at the spawn edge
    Spawned { gap_center: u32 },
    /// State was reinitialized after a game over
    Reset,
}

/// The falling entity the player controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub body: Rect,
    /// Vertical velocity (positive = up)
    pub velocity: f32,
    gravity: f32,
    jump_force: f32,
    hitbox_inset: f32,
}

impl Actor {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = config.actor_start();
        Self {
            body: Rect::new(x, y, config.actor_size, config.actor_size),
            velocity: 0.0,
            gravity: config.gravity,
            jump_force: config.jump_force,
            hitbox_inset: config.hitbox_inset,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Apply gravity then velocity
    ///
    /// Returns true once the actor has dropped to or below the bottom of the
    /// field.
    pub fn integrate(&mut self, dt: f32) -> bool {
        self.velocity += self.gravity * dt;
        self.body.pos.y += self.velocity * dt;
        self.body.pos.y <= 0.0
    }

    /// Instant upward impulse, replacing whatever velocity it had
    pub fn jump(&mut self) {
        self.velocity = self.jump_force;
    }

    pub fn hitbox(&self) -> Rect {
        self.body.inset(self.hitbox_inset)
    }
}

/// Upper and lower obstacle with the gap between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    /// Rooted to the bottom of the field
    pub lower: Rect,
    /// Hangs from the top of the field
    pub upper: Rect,
    /// Actor has cleared this pair (already scored)
    pub passed: bool,
    hitbox_inset: f32,
}

impl ObstaclePair {
    /// Build a pair at `x` whose gap is centered on `gap_center`
    pub fn new(x: f32, gap_center: f32, config: &GameConfig) -> Self {
        let half_gap = config.pipe_gap / 2.0;
        let lower_h = gap_center - half_gap;
        let upper_y = gap_center + half_gap;
        let upper_h = config.field_height - upper_y;
        Self {
            lower: Rect::new(x, 0.0, config.pipe_width, lower_h),
            upper: Rect::new(x, upper_y, config.pipe_width, upper_h),
            passed: false,
            hitbox_inset: config.hitbox_inset,
        }
    }

    /// Scroll left by `speed * dt`
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let dx = -speed * dt;
        self.lower.shift_x(dx);
        self.upper.shift_x(dx);
    }

    /// Right edge, shared by both halves
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.lower.right()
    }

    /// Completely past the left boundary
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() <= 0.0
    }

    pub fn gap(&self) -> f32 {
        self.upper.bottom() - self.lower.top()
    }

    pub fn gap_center(&self) -> f32 {
        (self.upper.bottom() + self.lower.top()) / 2.0
    }

    pub fn lower_hitbox(&self) -> Rect {
        self.lower.inset(self.hitbox_inset)
    }

    pub fn upper_hitbox(&self) -> Rect {
        self.upper.inset(self.hitbox_inset)
    }
}

/// Complete game state
///
/// Owns the actor, the active obstacles and the score. Nothing outside the
/// `sim` module mutates these directly.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub actor: Actor,
    /// Active obstacle pairs, oldest (leftmost) first
    pub obstacles: Vec<ObstaclePair>,
    pub score: u32,
    /// Text shown over the field, empty while playing
    pub message: &'static str,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a fresh run with the given configuration
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            actor: Actor::new(&config),
            config,
            phase: GamePhase::Playing,
            obstacles: Vec::new(),
            score: 0,
            message: "",
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.push_event(GameEvent::AmbientStart);
        Ok(state)
    }

    /// Reinitialize everything a run owns
    ///
    /// The RNG keeps its stream so consecutive runs get different obstacles.
    pub fn reset(&mut self) {
        self.actor = Actor::new(&self.config);
        self.obstacles.clear();
        self.score = 0;
        self.message = "";
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Reset);
        self.push_event(GameEvent::AmbientStart);
    }

    /// Switch to GameOver, once
    pub fn end_run(&mut self, cause: FailureCause) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.message = GAME_OVER_MESSAGE;
        self.push_event(GameEvent::AmbientStop);
        self.push_event(GameEvent::Failure { cause });
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn score_text(&self) -> String {
        self.score.to_string()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events produced since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events without consuming them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(cfg(), 1).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.actor.pos(), Vec2::new(80.0, 320.0));
        assert_eq!(state.actor.velocity, 0.0);
        assert_eq!(state.events(), &[GameEvent::AmbientStart]);
    }

    #[test]
    fn test_new_state_rejects_invalid_config() {
        let bad = cfg().with_field(360.0, 0.0);
        assert!(GameState::new(bad, 1).is_err());
    }

    #[test]
    fn test_gravity_decreases_velocity() {
        let mut actor = Actor::new(&cfg());
        let dt = 1.0 / 60.0;
        let mut prev = actor.velocity;
        for _ in 0..10 {
            actor.integrate(dt);
            assert!((prev - actor.velocity - 900.0 * dt).abs() < 1e-3);
            prev = actor.velocity;
        }
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut actor = Actor::new(&cfg());
        actor.velocity = -1234.0;
        actor.jump();
        assert_eq!(actor.velocity, 320.0);
        actor.velocity = 999.0;
        actor.jump();
        assert_eq!(actor.velocity, 320.0);
    }

    #[test]
    fn test_jump_then_integrate() {
        let mut actor = Actor::new(&cfg());
        let dt = 1.0 / 60.0;
        actor.jump();
        actor.integrate(dt);
        let expected = 320.0 + -900.0 * dt;
        assert!((actor.velocity - expected).abs() < 1e-4);
    }

    #[test]
    fn test_integrate_reports_floor() {
        let mut actor = Actor::new(&cfg());
        actor.body.pos.y = 0.0;
        actor.velocity = -10.0;
        assert!(actor.integrate(1.0 / 60.0));

        let mut actor = Actor::new(&cfg());
        assert!(!actor.integrate(1.0 / 60.0));
    }

    #[test]
    fn test_actor_hitbox_inset() {
        let actor = Actor::new(&cfg());
        let hb = actor.hitbox();
        assert_eq!(hb, Rect::new(88.0, 328.0, 44.0, 44.0));
    }

    #[test]
    fn test_pair_geometry() {
        let c = cfg();
        let pair = ObstaclePair::new(c.field_width, 300.0, &c);
        assert_eq!(pair.lower.size.y, 210.0);
        assert_eq!(pair.upper.size.y, 250.0);
        assert_eq!(pair.lower.pos, Vec2::new(360.0, 0.0));
        assert_eq!(pair.upper.pos, Vec2::new(360.0, 390.0));
        assert_eq!(pair.gap(), 180.0);
        assert_eq!(pair.gap_center(), 300.0);
        assert!(!pair.passed);
    }

    #[test]
    fn test_pair_advance_moves_both() {
        let c = cfg();
        let mut pair = ObstaclePair::new(100.0, 300.0, &c);
        pair.advance(0.5, 160.0);
        assert_eq!(pair.lower.pos.x, 20.0);
        assert_eq!(pair.upper.pos.x, 20.0);
    }

    #[test]
    fn test_pair_offscreen() {
        let c = cfg();
        assert!(ObstaclePair::new(-80.0, 300.0, &c).is_offscreen());
        assert!(!ObstaclePair::new(-79.0, 300.0, &c).is_offscreen());
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut state = GameState::new(cfg(), 1).unwrap();
        state.drain_events();
        state.end_run(FailureCause::Collision);
        state.end_run(FailureCause::OutOfBounds);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.message, GAME_OVER_MESSAGE);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::AmbientStop,
                GameEvent::Failure {
                    cause: FailureCause::Collision
                }
            ]
        );
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::new(cfg(), 1).unwrap();
        state.score = 7;
        state.obstacles.push(ObstaclePair::new(100.0, 300.0, &state.config));
        state.actor.body.pos.y = -5.0;
        state.actor.velocity = -300.0;
        state.end_run(FailureCause::OutOfBounds);
        state.drain_events();

        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.actor.pos(), Vec2::new(80.0, 320.0));
        assert_eq!(state.actor.velocity, 0.0);
        assert_eq!(state.message, "");
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Reset, GameEvent::AmbientStart]
        );
    }
}
