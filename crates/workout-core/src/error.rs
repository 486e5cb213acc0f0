//! Core error types for workout-core.
//!
//! Generation and timer operations report failures as values; nothing in the
//! public surface panics on bad input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session generation or timer control errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Exercise library validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while generating or driving a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Non-positive duration, or nothing left after equipment/tag filtering.
    #[error("Invalid session configuration: {0}")]
    InvalidConfiguration(String),

    /// A control operation was called before a plan was loaded.
    #[error("No active session: load a plan first")]
    NoActiveSession,

    /// `start` was called on a session that already finished.
    #[error("Session already completed")]
    SessionCompleted,

    /// The plan's durations no longer sum to its total.
    #[error("Time conservation violated: expected {expected}s, plan sums to {actual}s")]
    InvariantViolation { expected: u32, actual: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the config directory
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Exercise library validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Blank or untrimmed exercise name
    #[error("Invalid exercise name {name:?}: names must be non-empty and trimmed")]
    InvalidName { name: String },

    /// Two exercises share a name
    #[error("Duplicate exercise name: {0}")]
    DuplicateName(String),

    /// Difficulty outside the accepted range
    #[error("Difficulty {difficulty} for '{name}' is outside [{min}, {max}]")]
    DifficultyOutOfRange {
        name: String,
        difficulty: f64,
        min: f64,
        max: f64,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_converts_into_core_error() {
        let err: CoreError = SessionError::NoActiveSession.into();
        assert!(matches!(err, CoreError::Session(SessionError::NoActiveSession)));
        assert_eq!(err.to_string(), "Session error: No active session: load a plan first");
    }

    #[test]
    fn invariant_violation_message_names_both_totals() {
        let err = SessionError::InvariantViolation {
            expected: 600,
            actual: 590,
        };
        assert_eq!(
            err.to_string(),
            "Time conservation violated: expected 600s, plan sums to 590s"
        );
    }
}
