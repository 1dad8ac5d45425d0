//! The `JobQueue` trait — the contract every queue backend must fulfil.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Job, QueueError};

/// A FIFO work queue with at-least-once delivery.
///
/// Enqueueing is fire-and-forget from the producer's side.  A dequeued job
/// stays in flight until the consumer calls [`JobQueue::complete`]; one that
/// is never completed is not lost.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Name of the underlying queue.
    fn name(&self) -> &str;

    /// Push a single job.
    async fn enqueue(&self, job: Job) -> Result<(), QueueError>;

    /// Push several jobs.  Backends that can batch should override this.
    async fn enqueue_many(&self, jobs: Vec<Job>) -> Result<(), QueueError> {
        for job in jobs {
            self.enqueue(job).await?;
        }
        Ok(())
    }

    /// Take the oldest job into flight, waiting up to `timeout` for one to
    /// arrive.
    ///
    /// Returns `Ok(None)` when the timeout expires with nothing queued.
    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError>;

    /// Acknowledge a dequeued job so it is dropped from the in-flight set.
    async fn complete(&self, job: &Job) -> Result<(), QueueError>;
}
