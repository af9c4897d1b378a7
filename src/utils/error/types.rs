//! Error types for the performance layer

use thiserror::Error;

/// Result type alias for the performance layer
pub type Result<T> = std::result::Result<T, PerfError>;

/// Main error type for the performance layer
#[derive(Error, Debug)]
pub enum PerfError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Cache store errors that are not tied to a specific backend
    #[error("Cache error: {0}")]
    Cache(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metric gathering errors
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Request exceeded its time budget
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Outbound call refused by the active policy
    #[error("Outbound call blocked: {0}")]
    OutboundBlocked(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
