//! Queue connection settings.

use std::time::Duration;

/// Immutable queue configuration, built once at startup and handed to
/// [`RedisQueue::connect`](crate::RedisQueue::connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Redis connection URL, e.g. `redis://127.0.0.1:6379/0`.
    pub redis_url: String,
    /// Name of the Redis list jobs are pushed onto.
    pub name: String,
    /// How long a worker blocks waiting for a job before looping.
    pub poll_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            name: "default".to_string(),
            poll_timeout: Duration::from_secs(1),
        }
    }
}

impl QueueConfig {
    pub fn new(redis_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the worker poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}
