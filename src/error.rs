//! Configuration errors
//!
//! Everything that can go wrong happens before the first tick: reading
//! settings, finding level files and validating their grids. The frame
//! update itself has no failure path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a game session.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A settings or level file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON did not parse
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings value is outside its legal range
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// The level source holds no levels at all
    #[error("no levels found in {0}")]
    NoLevels(String),

    /// A level index past the end of the source was requested
    #[error("level {index} does not exist ({count} levels available)")]
    MissingLevel { index: usize, count: usize },

    /// A level grid does not fit the playfield
    #[error("level {index} is malformed: {reason}")]
    MalformedLevel { index: usize, reason: String },
}

/// Result type alias for session setup.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Creates an I/O error tagged with the offending path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a range-check failure for a settings field.
    #[must_use]
    pub fn invalid_setting<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a malformed-level error.
    #[must_use]
    pub fn malformed_level<S: Into<String>>(index: usize, reason: S) -> Self {
        Self::MalformedLevel {
            index,
            reason: reason.into(),
        }
    }
}
