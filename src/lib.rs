//! Gate Flyer - a one-button arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `view`: Read-only frame snapshots for whatever draws the game
//! - `audio`: Game event to sound cue routing (Web Audio in the browser)
//! - `renderer`: WebGPU rendering pipeline
//! - `config`: Validated gameplay configuration

pub mod audio;
pub mod config;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod view;

pub use config::GameConfig;
pub use error::ConfigError;
pub use settings::Settings;
pub use view::Frame;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f32 = 2.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 360.0;
    pub const FIELD_HEIGHT: f32 = 640.0;

    /// Vertical acceleration (negative = down, units/s²)
    pub const GRAVITY: f32 = -900.0;
    /// Upward velocity set by a jump
    pub const JUMP_FORCE: f32 = 320.0;

    /// Actor defaults
    pub const ACTOR_SIZE: f32 = 60.0;
    pub const ACTOR_START_X: f32 = 80.0;

    /// Obstacle defaults
    pub const PIPE_SPEED: f32 = 160.0;
    pub const PIPE_GAP: f32 = 180.0;
    pub const PIPE_WIDTH: f32 = 80.0;

    /// Gap center never comes closer than this to the top or bottom edge
    pub const SPAWN_MARGIN: u32 = 200;
    /// Hitboxes are shrunk by this much on every side
    pub const HITBOX_INSET: f32 = 8.0;

    /// Shown while the run is over
    pub const GAME_OVER_MESSAGE: &str = "GAME OVER\nTap to Restart";
}
