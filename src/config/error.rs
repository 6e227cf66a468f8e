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

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid upload size limit")]
    InvalidUploadLimit,

    #[error("Invalid stored batch limit")]
    InvalidBatchLimit,

    #[error("Invalid OpenAI retry count")]
    InvalidMaxRetries,

    #[error("Invalid OpenAI base URL")]
    InvalidBaseUrl,

    #[error("Invalid sender email address")]
    InvalidSenderEmail,

    #[error("Invalid team email address")]
    InvalidTeamEmail,
}
