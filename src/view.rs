//! Read-only snapshot of what should be on screen
//!
//! Renderers and HUDs consume a [`Frame`]; they never touch simulation state.

use serde::{Deserialize, Serialize};

use crate::sim::rect::Rect;
use crate::sim::state::{GamePhase, GameState};

/// Which half of an obstacle pair a rectangle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleHalf {
    Lower,
    /// Drawn flipped vertically
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSprite {
    pub rect: Rect,
    pub half: ObstacleHalf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Field width and height
    pub field: [f32; 2],
    pub actor: Rect,
    pub obstacles: Vec<ObstacleSprite>,
    pub score: u32,
    pub score_text: String,
    /// Game-over text, empty while playing
    pub message: String,
    pub phase: GamePhase,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let obstacles = state
            .obstacles
            .iter()
            .flat_map(|pair| {
                [
                    ObstacleSprite {
                        rect: pair.lower,
                        half: ObstacleHalf::Lower,
                    },
                    ObstacleSprite {
                        rect: pair.upper,
                        half: ObstacleHalf::Upper,
                    },
                ]
            })
            .collect();

        Self {
            field: [state.config.field_width, state.config.field_height],
            actor: state.actor.body,
            obstacles,
            score: state.score,
            score_text: state.score_text(),
            message: state.message.to_string(),
            phase: state.phase,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
