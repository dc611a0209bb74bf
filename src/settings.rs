//! Game tuning settings
//!
//! Loaded from a JSON file by the host; every field has a default so a
//! partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};

/// Session tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (random when absent)
    pub seed: Option<u64>,

    // === Powerups ===
    /// Chance a destroyed brick drops a powerup (0.0 - 1.0)
    pub powerup_probability: f64,
    /// Seconds a timed effect lasts before it reverts
    pub effect_duration_secs: f64,
    /// Powerup fall speed (units per tick)
    pub powerup_fall_speed: f32,

    // === Movement ===
    /// Serve speed of a fresh ball (units per tick)
    pub ball_speed: f32,
    /// Paddle move speed (units per tick)
    pub paddle_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            powerup_probability: POWERUP_PROBABILITY,
            effect_duration_secs: EFFECT_DURATION_SECS,
            powerup_fall_speed: POWERUP_FALL_SPEED,

            ball_speed: BALL_START_SPEED,
            paddle_speed: PADDLE_SPEED,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every value against its legal range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.powerup_probability) {
            return Err(ConfigError::invalid_setting(
                "powerup_probability",
                format!("{} is not within [0, 1]", self.powerup_probability),
            ));
        }
        if !(self.effect_duration_secs.is_finite() && self.effect_duration_secs > 0.0) {
            return Err(ConfigError::invalid_setting(
                "effect_duration_secs",
                "must be a positive number of seconds",
            ));
        }
        if !(BALL_MIN_SPEED..=BALL_MAX_SPEED).contains(&self.ball_speed) {
            return Err(ConfigError::invalid_setting(
                "ball_speed",
                format!("{} is not within [{BALL_MIN_SPEED}, {BALL_MAX_SPEED}]", self.ball_speed),
            ));
        }
        if !(self.paddle_speed.is_finite() && self.paddle_speed > 0.0) {
            return Err(ConfigError::invalid_setting("paddle_speed", "must be positive"));
        }
        if !(self.powerup_fall_speed.is_finite() && self.powerup_fall_speed > 0.0) {
            return Err(ConfigError::invalid_setting(
                "powerup_fall_speed",
                "must be positive",
            ));
        }
        Ok(())
    }
}
