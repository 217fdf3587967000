use thiserror::Error;

/// Reasons a [`GameConfig`](crate::GameConfig) is refused at startup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("field dimensions must be positive, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("gravity must pull downward (negative), got {0}")]
    GravityNotDownward(f32),
    #[error("gap of {gap} does not fit in a field {height} high")]
    GapTooLarge { gap: f32, height: f32 },
    #[error("spawn margin {margin} leaves no room for a gap center in a field {height} high")]
    MarginTooLarge { margin: u32, height: f32 },
    #[error("half the gap ({half_gap}) exceeds the spawn margin ({margin}); obstacles would have negative height")]
    GapExceedsMargin { half_gap: f32, margin: u32 },
    #[error("actor size {size} is too small for a hitbox inset of {inset}")]
    HitboxTooSmall { size: f32, inset: f32 },
}
