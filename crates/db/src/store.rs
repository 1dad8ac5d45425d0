//! The `TaskStore` trait — the persistence contract the API depends on.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{DbError, TaskRow};

/// Outcome of a create-if-absent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    /// A new row was inserted.
    New,
    /// A row with the same `(repository, name)` already existed.
    Existing,
}

impl Created {
    pub fn is_new(self) -> bool {
        matches!(self, Created::New)
    }
}

/// Task persistence.
///
/// Implementations must guarantee that `(repository, name)` stays unique even
/// under concurrent `create_unique` calls.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task unless one with the same `(repository, name)` exists.
    ///
    /// Returns the stored row (new or pre-existing) and which case occurred.
    async fn create_unique(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<(TaskRow, Created), DbError>;

    /// Fetch a task by primary key; `Ok(None)` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskRow>, DbError>;

    /// Return every task, oldest first.
    async fn find_all(&self) -> Result<Vec<TaskRow>, DbError>;
}
