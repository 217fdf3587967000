//! Gameplay configuration
//!
//! Everything the simulation treats as constant for a session. Passed into
//! the game at construction and again on reset.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play field width (the spawn edge sits here)
    pub field_width: f32,
    /// Play field height
    pub field_height: f32,
    /// Vertical acceleration, negative is down
    pub gravity: f32,
    /// Velocity set by a jump
    pub jump_force: f32,
    /// Horizontal obstacle speed
    pub pipe_speed: f32,
    /// Vertical opening between upper and lower obstacle
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Actor is square
    pub actor_size: f32,
    /// Fixed horizontal offset of the actor
    pub actor_start_x: f32,
    pub hitbox_inset: f32,
    /// Minimum distance from gap center to the top/bottom edge
    pub spawn_margin: u32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Physics step length in seconds
    pub tick_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            pipe_speed: PIPE_SPEED,
            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            actor_size: ACTOR_SIZE,
            actor_start_x: ACTOR_START_X,
            hitbox_inset: HITBOX_INSET,
            spawn_margin: SPAWN_MARGIN,
            spawn_interval: SPAWN_INTERVAL,
            tick_dt: SIM_DT,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl GameConfig {
    /// Same config with a different field size
    pub fn with_field(mut self, width: f32, height: f32) -> Self {
        self.field_width = width;
        self.field_height = height;
        self
    }

    /// Reject anything that would produce undefined spawn geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.field_width, self.field_height);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ConfigError::InvalidField {
                width: w,
                height: h,
            });
        }

        positive("jump_force", self.jump_force)?;
        positive("pipe_speed", self.pipe_speed)?;
        positive("pipe_gap", self.pipe_gap)?;
        positive("pipe_width", self.pipe_width)?;
        positive("actor_size", self.actor_size)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("tick_dt", self.tick_dt)?;
        if !self.actor_start_x.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "actor_start_x",
                value: self.actor_start_x,
            });
        }

        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(ConfigError::GravityNotDownward(self.gravity));
        }

        if self.pipe_gap >= h {
            return Err(ConfigError::GapTooLarge {
                gap: self.pipe_gap,
                height: h,
            });
        }

        // Gap centers are drawn from [margin, height - margin]
        if 2.0 * self.spawn_margin as f32 > h {
            return Err(ConfigError::MarginTooLarge {
                margin: self.spawn_margin,
                height: h,
            });
        }

        let half_gap = self.pipe_gap / 2.0;
        if half_gap > self.spawn_margin as f32 {
            return Err(ConfigError::GapExceedsMargin {
                half_gap,
                margin: self.spawn_margin,
            });
        }

        if !(self.hitbox_inset >= 0.0 && self.actor_size > 2.0 * self.hitbox_inset) {
            return Err(ConfigError::HitboxTooSmall {
                size: self.actor_size,
                inset: self.hitbox_inset,
            });
        }

        Ok(())
    }

    /// Inclusive range of gap centers the spawner may pick
    pub fn gap_center_range(&self) -> (u32, u32) {
        let max = (self.field_height as u32).saturating_sub(self.spawn_margin);
        (self.spawn_margin, max.max(self.spawn_margin))
    }

    /// Starting actor position: fixed x, vertically centered
    pub fn actor_start(&self) -> (f32, f32) {
        (self.actor_start_x, self.field_height / 2.0)
    }
}
