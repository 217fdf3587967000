//! Axis-aligned rectangle geometry shared by the actor and obstacles
//!
//! Field coordinates: origin at the bottom-left corner, y grows upward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Shrink by `amount` on every side
    ///
    /// Hitboxes are deliberately smaller than what is drawn. A negative size
    /// is clamped to zero.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(amount),
            size: (self.size - Vec2::splat(2.0 * amount)).max(Vec2::ZERO),
        }
    }

    /// Move horizontally
    #[inline]
    pub fn shift_x(&mut self, dx: f32) {
        self.pos.x += dx;
    }
}
