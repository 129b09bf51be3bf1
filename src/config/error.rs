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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Cannot resolve listen address: {0}")]
    InvalidAddress(String),

    #[error("Invalid timeout")]
    InvalidTimeout,

    #[error("Queue capacities must be greater than zero")]
    InvalidQueueCapacity,

    #[error("JWT secret is too short for production")]
    WeakJwtSecret,
}
