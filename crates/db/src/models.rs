//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models; the API serialises them as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// tasks
// ---------------------------------------------------------------------------

/// A persisted task row.
///
/// `(repository, name)` is unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    /// Target image or location the task operates on.
    pub repository: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TaskRow {
    /// Build a fresh, not-yet-persisted row with a server-assigned id.
    pub fn new(repository: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            repository: repository.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// True when this row carries the given uniqueness key.
    pub fn has_key(&self, repository: &str, name: &str) -> bool {
        self.repository == repository && self.name == name
    }
}
