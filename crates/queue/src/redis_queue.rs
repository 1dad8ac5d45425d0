//! Redis-backed job queue.
//!
//! Jobs are JSON strings in a Redis list named after the queue.  Producers
//! `LPUSH`; consumers `BRPOPLPUSH` each job into `{name}:processing` and only
//! remove it from there once it has been handled.  A job whose consumer dies
//! mid-flight therefore stays in the processing list until
//! [`RedisQueue::recover_processing`] puts it back.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::{Job, JobQueue, QueueConfig, QueueError};

/// [`JobQueue`] over a Redis list.
#[derive(Clone)]
pub struct RedisQueue {
    /// Connection manager (reconnects automatically).
    redis: ConnectionManager,
    queue_name: String,
    processing_queue: String,
}

impl RedisQueue {
    /// Connect using `config`.
    ///
    /// # Errors
    /// `QueueError::ConnectionFailed` if the URL is invalid or Redis is
    /// unreachable.
    pub async fn connect(config: &QueueConfig) -> Result<Self, QueueError> {
        info!(queue = %config.name, "Connecting to redis queue");

        let client = redis::Client::open(config.redis_url.as_str())
            .map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;

        let redis = ConnectionManager::new(client)
            .await
            .map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;

        Ok(Self::from_connection(redis, &config.name))
    }

    /// Build a queue on top of an existing connection manager.
    pub fn from_connection(redis: ConnectionManager, queue_name: &str) -> Self {
        Self {
            redis,
            queue_name: queue_name.to_string(),
            processing_queue: format!("{}:processing", queue_name),
        }
    }

    /// Move every job left in the processing list back onto the queue.
    ///
    /// Only safe while no other consumer is running on this queue: their
    /// in-flight jobs would be delivered twice.  Returns how many jobs moved.
    pub async fn recover_processing(&self) -> Result<usize, QueueError> {
        let mut conn = self.redis.clone();
        let mut recovered = 0;

        // RPOPLPUSH moves one element atomically, oldest first.  Recovered
        // jobs rejoin at the back of the queue.
        loop {
            let moved: Option<String> = redis::cmd("RPOPLPUSH")
                .arg(&self.processing_queue)
                .arg(&self.queue_name)
                .query_async(&mut conn)
                .await?;
            if moved.is_none() {
                break;
            }
            recovered += 1;
        }

        if recovered > 0 {
            info!(queue = %self.queue_name, recovered, "requeued in-flight jobs");
        }
        Ok(recovered)
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    fn name(&self) -> &str {
        &self.queue_name
    }

    async fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        let serialized = serde_json::to_string(&job)?;
        let mut conn = self.redis.clone();
        conn.lpush::<_, _, ()>(&self.queue_name, serialized).await?;
        debug!(job_id = %job.id, task_id = %job.task_id, "job enqueued");
        Ok(())
    }

    /// A single variadic `LPUSH`, so the batch lands all at once or not at
    /// all.
    async fn enqueue_many(&self, jobs: Vec<Job>) -> Result<(), QueueError> {
        if jobs.is_empty() {
            return Ok(());
        }

        let serialized: Result<Vec<String>, _> = jobs.iter().map(serde_json::to_string).collect();
        let serialized = serialized?;

        let mut conn = self.redis.clone();
        conn.lpush::<_, _, ()>(&self.queue_name, &serialized).await?;

        debug!(count = jobs.len(), queue = %self.queue_name, "jobs enqueued");
        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError> {
        let mut conn = self.redis.clone();
        // A zero timeout blocks forever.
        let timeout_secs = timeout.as_secs().max(1) as usize;

        let result: Option<String> = redis::cmd("BRPOPLPUSH")
            .arg(&self.queue_name)
            .arg(&self.processing_queue)
            .arg(timeout_secs)
            .query_async(&mut conn)
            .await?;

        match result {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn complete(&self, job: &Job) -> Result<(), QueueError> {
        let mut conn = self.redis.clone();
        let entries: Vec<String> = conn.lrange(&self.processing_queue, 0, -1).await?;

        // Match on id rather than on the raw string so a re-serialisation
        // difference cannot leave the entry behind.
        for entry in entries {
            if let Ok(stored) = serde_json::from_str::<Job>(&entry) {
                if stored.id == job.id {
                    conn.lrem::<_, _, ()>(&self.processing_queue, 1, &entry)
                        .await?;
                    return Ok(());
                }
            }
        }

        warn!(job_id = %job.id, queue = %self.queue_name, "completed job was not in the processing list");
        Ok(())
    }
}
