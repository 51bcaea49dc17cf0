//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid user id in {0}")]
    InvalidUserId(&'static str),

    #[error("Unknown command category: {0}")]
    UnknownCategory(String),

    #[error("Poll interval must be at least 100ms")]
    InvalidPollInterval,

    #[error("Message size must be between 1 and 2000 characters")]
    InvalidMessageSize,

    #[error("Fetch limit must be between 1 and 100")]
    InvalidFetchLimit,
}
