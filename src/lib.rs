//! Brickfall - brick-breaking arcade simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, effects, levels)
//! - `settings`: Data-driven game tuning
//! - `error`: Configuration errors surfaced while loading a session

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (origin bottom-left, y up)
    pub const PLAYFIELD_WIDTH: f32 = 960.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1000.0;

    /// Ball sprite extent
    pub const BALL_SIZE: f32 = 16.0;
    /// Default ball speed (units per tick)
    pub const BALL_START_SPEED: f32 = 7.0;
    /// Minimum ball speed after any effect
    pub const BALL_MIN_SPEED: f32 = 3.5;
    /// Maximum ball speed after any effect
    pub const BALL_MAX_SPEED: f32 = 21.0;
    /// Spawn height of the serve ball
    pub const BALL_SERVE_Y: f32 = 50.0;

    /// Paddle sprite extent before scaling
    pub const PADDLE_BASE_WIDTH: f32 = 80.0;
    pub const PADDLE_BASE_HEIGHT: f32 = 16.0;
    /// Paddle scale at level start
    pub const PADDLE_ORIGINAL_SCALE: f32 = 1.5;
    /// Default paddle speed (units per tick)
    pub const PADDLE_SPEED: f32 = 7.0;

    /// Brick cell extent (grid cell = brick sprite)
    pub const BRICK_WIDTH: f32 = 96.0;
    pub const BRICK_HEIGHT: f32 = 32.0;

    /// Falling powerup extent and speed
    pub const POWERUP_SIZE: f32 = 24.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    /// Chance a destroyed brick drops a powerup
    pub const POWERUP_PROBABILITY: f64 = 0.10;
    /// Seconds a timed effect stays active
    pub const EFFECT_DURATION_SECS: f64 = 12.0;

    /// Effect factors
    pub const SPEED_UP_FACTOR: f32 = 1.5;
    pub const SLOW_DOWN_FACTOR: f32 = 1.3;
    pub const GROW_FACTOR: f32 = 1.5;
    pub const SHRINK_FACTOR: f32 = 1.3;
    /// Paddle scale bounds relative to the original scale
    pub const MAX_SCALE_MULTIPLIER: f32 = 2.0;
    pub const MIN_SCALE_DIVISOR: f32 = 1.6;

    /// Grid capacity of the playfield
    pub const GRID_COLUMNS: usize = 10; // 960 / 96
    /// Row 0 sits one brick height below the ceiling, so one row is lost
    pub const GRID_ROWS: usize = 30; // floor(1000 / 32) - 1
}

/// Clamp a ball speed into the legal range
#[inline]
pub fn clamp_speed(speed: f32) -> f32 {
    speed.clamp(consts::BALL_MIN_SPEED, consts::BALL_MAX_SPEED)
}
