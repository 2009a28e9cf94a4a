//! Core error types for chime-core.
//!
//! Nothing in the aggregation core is fatal: service failures degrade to
//! the last consistent snapshot. These types exist so callers can log and
//! classify what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Errors reported by the external notification/scheduling service.
///
/// All of these are treated as transient by the overlay runtime: the
/// previous snapshot stays on screen and the next refresh retries.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service did not answer (down, restarting, not yet registered).
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a payload the core could not interpret.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A command referenced a record the service does not know.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A command was rejected by the service.
    #[error("Command rejected: {0}")]
    Rejected(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid time-of-day component
    #[error("Invalid time of day {hour:02}:{minute:02}")]
    InvalidTimeOfDay { hour: u32, minute: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
