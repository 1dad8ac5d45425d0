//! Queue-level error type.

use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Failed to connect to Redis.
    #[error("redis connection failed: {0}")]
    ConnectionFailed(String),

    /// Redis command failed.
    #[error("redis operation failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// Job could not be (de)serialised.
    #[error("job serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}
