//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod game;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{FixedClock, Step};
pub use collision::overlaps;
pub use game::Game;
pub use rect::Rect;
pub use spawner::{spawn, spawn_with_center};
pub use state::{Actor, FailureCause, GameEvent, GamePhase, GameState, ObstaclePair};
pub use tick::{Command, primary_action, tick};
