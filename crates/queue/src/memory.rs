//! `InMemoryQueue` — a [`JobQueue`] held in process memory.
//!
//! Records every job it receives so tests can assert on exactly what was
//! enqueued.  Can be built in an "unavailable" mode that rejects enqueues.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::{Job, JobQueue, QueueError};

#[derive(Debug)]
struct Inner {
    name: String,
    pending: Mutex<VecDeque<Job>>,
    /// Dequeued but not yet completed.
    in_flight: Mutex<Vec<Job>>,
    /// Every job ever accepted, in enqueue order.
    history: Mutex<Vec<Job>>,
    arrived: Notify,
    unavailable: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InMemoryQueue {
    inner: Arc<Inner>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new("default")
    }
}

impl InMemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// A queue that fails every enqueue with `QueueError::Unavailable`.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::build("default".to_string(), Some(msg.into()))
    }

    fn build(name: String, unavailable: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                pending: Mutex::new(VecDeque::new()),
                in_flight: Mutex::new(Vec::new()),
                history: Mutex::new(Vec::new()),
                arrived: Notify::new(),
                unavailable,
            }),
        }
    }

    /// Every job accepted so far, including ones already dequeued.
    pub fn enqueued(&self) -> Vec<Job> {
        self.inner
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of jobs still waiting.
    pub fn len(&self) -> usize {
        self.pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Jobs handed out by `dequeue` and not yet completed.
    pub fn in_flight(&self) -> Vec<Job> {
        self.in_flight_jobs().clone()
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, VecDeque<Job>> {
        self.inner.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn in_flight_jobs(&self) -> std::sync::MutexGuard<'_, Vec<Job>> {
        self.inner.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move the oldest pending job into flight.
    fn take_next(&self) -> Option<Job> {
        let job = self.pending().pop_front()?;
        self.in_flight_jobs().push(job.clone());
        Some(job)
    }
}

#[async_trait]
impl JobQueue for InMemoryQueue {
    fn name(&self) -> &str {
        &self.inner.name
    }

    async fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        if let Some(msg) = &self.inner.unavailable {
            return Err(QueueError::Unavailable(msg.clone()));
        }

        self.inner
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(job.clone());
        self.pending().push_back(job);
        self.inner.arrived.notify_one();
        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError> {
        let deadline = Instant::now() + timeout;

        // A wake-up can be a stale permit from an earlier enqueue, so keep
        // waiting until a job shows up or the deadline passes.
        loop {
            let arrived = self.inner.arrived.notified();
            if let Some(job) = self.take_next() {
                return Ok(Some(job));
            }
            if tokio::time::timeout_at(deadline, arrived).await.is_err() {
                return Ok(self.take_next());
            }
        }
    }

    async fn complete(&self, job: &Job) -> Result<(), QueueError> {
        self.in_flight_jobs().retain(|j| j.id != job.id);
        Ok(())
    }
}
