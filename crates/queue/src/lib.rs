//! `queue` crate — job messages and the work queue they travel through.
//!
//! The API pushes [`Job`]s through the [`JobQueue`] trait; a [`Worker`]
//! drains them and hands each one to a [`JobHandler`].  Two backends ship:
//! [`RedisQueue`] for deployments and [`InMemoryQueue`] for tests.

pub mod config;
pub mod error;
pub mod job;
pub mod memory;
pub mod redis_queue;
pub mod traits;
pub mod worker;

pub use config::QueueConfig;
pub use error::QueueError;
pub use job::{Job, DEFAULT_OPERATION};
pub use memory::InMemoryQueue;
pub use redis_queue::RedisQueue;
pub use traits::JobQueue;
pub use worker::{JobHandler, LoggingHandler, Worker};
