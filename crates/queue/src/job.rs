//! The job message pushed onto the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation used when a request does not name one.
pub const DEFAULT_OPERATION: &str = "RUN";

/// A request to run `operation` against the task `task_id`.
///
/// Jobs are transient: they live only in the queue and are never persisted
/// by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique per message, so repeated submissions can be told apart in logs.
    pub id: Uuid,
    pub task_id: Uuid,
    pub operation: String,
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    pub fn new(task_id: Uuid, operation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            operation: operation.into(),
            enqueued_at: Utc::now(),
        }
    }

    /// `times` independent messages for the same `(task_id, operation)`.
    pub fn repeated(task_id: Uuid, operation: &str, times: usize) -> Vec<Self> {
        (0..times).map(|_| Self::new(task_id, operation)).collect()
    }
}
