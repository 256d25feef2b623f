//! Error types for BibliaAI
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for BibliaAI operations
///
/// Schema and transport failures raised while requesting content are
/// folded into [`BibliaError::Generation`] before they reach the caller.
/// Illustration failures and corrupt stored history never surface at all;
/// they are logged and absorbed where they happen.
#[derive(Error, Debug)]
pub enum BibliaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decoded response is missing required structure
    #[error("Schema error: {0}")]
    Schema(String),

    /// The generative capability was unreachable, failed, or returned
    /// content that could not be parsed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Provider-related errors (HTTP status, unexpected payloads)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Persisted history could not be decoded
    #[error("Stored data could not be decoded: {0}")]
    StorageDecode(String),

    /// Local persistence errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// No single history entry matches the requested id
    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for BibliaAI operations
///
/// Uses `anyhow::Error` so context can be attached while propagating.
/// Callers that need to branch on a failure kind use
/// `err.downcast_ref::<BibliaError>()`.
pub type Result<T> = anyhow::Result<T>;
