//! Queue consumer.
//!
//! A [`Worker`] pulls jobs off a [`JobQueue`] one at a time and passes each
//! to a [`JobHandler`].  A job is acknowledged only after the handler
//! returns, so one interrupted mid-handle stays in flight.  There is no
//! retry: a job whose handler fails is logged and acknowledged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::{Job, JobQueue, QueueError};

/// What to do with a dequeued job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> anyhow::Result<()>;
}

/// Handler that only records the job in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

#[async_trait]
impl JobHandler for LoggingHandler {
    async fn handle(&self, job: &Job) -> anyhow::Result<()> {
        info!(
            job_id = %job.id,
            task_id = %job.task_id,
            operation = %job.operation,
            enqueued_at = %job.enqueued_at,
            "executing job"
        );
        Ok(())
    }
}

pub struct Worker {
    queue: Arc<dyn JobQueue>,
    handler: Arc<dyn JobHandler>,
    poll_timeout: Duration,
}

impl Worker {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        handler: Arc<dyn JobHandler>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            handler,
            poll_timeout,
        }
    }

    /// Wait up to the poll timeout for one job and handle it.
    ///
    /// Returns `true` if a job was taken off the queue (whether or not the
    /// handler succeeded).
    pub async fn run_once(&self) -> bool {
        let next = self.queue.dequeue(self.poll_timeout).await;
        self.dispatch(next).await
    }

    /// Process jobs until `shutdown` resolves.  Returns how many jobs were
    /// taken off the queue.
    ///
    /// Shutdown is only observed while waiting on the queue, never in the
    /// middle of a handler.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        info!(queue = %self.queue.name(), "worker started");
        tokio::pin!(shutdown);

        let mut processed = 0u64;
        loop {
            let next = tokio::select! {
                _ = &mut shutdown => break,
                next = self.queue.dequeue(self.poll_timeout) => next,
            };
            if self.dispatch(next).await {
                processed += 1;
            }
        }

        info!(queue = %self.queue.name(), processed, "worker stopped");
        processed
    }

    async fn dispatch(&self, next: Result<Option<Job>, QueueError>) -> bool {
        match next {
            Ok(Some(job)) => {
                self.process(job).await;
                true
            }
            Ok(None) => {
                debug!(queue = %self.queue.name(), "no jobs available");
                false
            }
            Err(e) => {
                error!(queue = %self.queue.name(), error = %e, "failed to dequeue job");
                tokio::time::sleep(self.poll_timeout).await;
                false
            }
        }
    }

    async fn process(&self, job: Job) {
        match self.handler.handle(&job).await {
            Ok(()) => debug!(job_id = %job.id, "job finished"),
            Err(e) => error!(
                job_id = %job.id,
                task_id = %job.task_id,
                operation = %job.operation,
                error = %e,
                "job failed"
            ),
        }

        if let Err(e) = self.queue.complete(&job).await {
            error!(job_id = %job.id, error = %e, "failed to acknowledge job");
        }
    }
}
