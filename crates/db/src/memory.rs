//! `InMemoryTaskStore` — a [`TaskStore`] held in process memory.
//!
//! Used by the API tests and for running the server without Postgres.
//! Uniqueness is enforced under a single mutex, so it holds under
//! concurrent callers just like the SQL constraint does.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    store::{Created, TaskStore},
    DbError, TaskRow,
};

/// Behaviour injected into the store at construction time.
#[derive(Debug, Clone)]
enum StoreBehaviour {
    /// Serve requests normally.
    Healthy,
    /// Fail every call with `DbError::Unavailable`.
    Failing(String),
}

#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    rows: Arc<Mutex<Vec<TaskRow>>>,
    behaviour: StoreBehaviour,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskStore {
    /// An empty, healthy store.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            behaviour: StoreBehaviour::Healthy,
        }
    }

    /// A store whose every call fails with the given message.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            behaviour: StoreBehaviour::Failing(msg.into()),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TaskRow>> {
        // A poisoned lock only means another test thread panicked; the data
        // itself is still consistent.
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), DbError> {
        match &self.behaviour {
            StoreBehaviour::Healthy => Ok(()),
            StoreBehaviour::Failing(msg) => Err(DbError::Unavailable(msg.clone())),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create_unique(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<(TaskRow, Created), DbError> {
        self.check()?;
        let mut rows = self.lock();

        if let Some(existing) = rows.iter().find(|r| r.has_key(repository, name)) {
            return Ok((existing.clone(), Created::Existing));
        }

        let row = TaskRow::new(repository, name);
        rows.push(row.clone());
        Ok((row, Created::New))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskRow>, DbError> {
        self.check()?;
        Ok(self.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<TaskRow>, DbError> {
        self.check()?;
        Ok(self.lock().clone())
    }
}
