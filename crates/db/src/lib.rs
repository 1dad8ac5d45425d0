//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, the `tasks` row struct, and the [`TaskStore`]
//! contract with a Postgres and an in-memory implementation.  No HTTP or
//! queue logic lives here.

pub mod error;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::DbError;
pub use memory::InMemoryTaskStore;
pub use models::TaskRow;
pub use pool::{DbConfig, DbPool};
pub use repository::tasks::PgTaskStore;
pub use store::{Created, TaskStore};
