//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An insert hit the `(repository, name)` constraint, yet the row it
    /// conflicted with could not be read back.
    #[error("task ({repository}, {name}) conflicted on insert but was not found")]
    ConflictingRowMissing { repository: String, name: String },

    /// Raised by the in-memory store when it is configured to fail.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
