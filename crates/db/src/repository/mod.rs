//! Repository implementations — one module per table.
//!
//! Every repository wraps a `DbPool` and returns `Result<T, DbError>`.
//! No business logic — pure SQL.

pub mod tasks;
