//! Fixed-step scheduler
//!
//! Turns variable frame deltas into the two periodic triggers the simulation
//! needs: the physics tick and the (much slower) spawn tick.

use crate::config::GameConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Slack for float error when comparing accumulated time against a step
const EPSILON: f64 = 1e-6;

/// One scheduled unit of work, in time order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Physics,
    Spawn,
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    tick_dt: f64,
    /// Physics ticks between two spawns
    ticks_per_spawn: u64,
    max_substeps: u32,
    accumulator: f64,
    ticks: u64,
}

impl FixedClock {
    pub fn new(tick_dt: f32, spawn_interval: f32) -> Self {
        let ticks_per_spawn = (spawn_interval / tick_dt).round().max(1.0) as u64;
        Self {
            tick_dt: tick_dt as f64,
            ticks_per_spawn,
            max_substeps: MAX_SUBSTEPS,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.tick_dt, config.spawn_interval)
    }

    /// Cap on physics steps per call to [`advance`](Self::advance)
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    #[inline]
    pub fn tick_dt(&self) -> f32 {
        self.tick_dt as f32
    }

    /// Physics ticks since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start both timers over (new run)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.ticks = 0;
    }

    /// Feed one frame's worth of wall time and collect what is now due
    ///
    /// Frame time is clamped so a stalled tab cannot trigger a burst of
    /// catch-up work, and at most `max_substeps` physics steps run per frame.
    pub fn advance(&mut self, frame_dt: f32) -> Vec<Step> {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt as f64;

        let mut steps = Vec::new();
        let mut substeps = 0;
        while self.accumulator + EPSILON >= self.tick_dt && substeps < self.max_substeps {
            self.accumulator -= self.tick_dt;
            self.ticks += 1;
            substeps += 1;
            steps.push(Step::Physics);
            if self.ticks % self.ticks_per_spawn == 0 {
                steps.push(Step::Spawn);
            }
        }

        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.clamp(0.0, self.tick_dt);
        }
        self.accumulator = self.accumulator.max(0.0);

        steps
    }
}
