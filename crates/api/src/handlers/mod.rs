//! Axum handlers, one module per resource.

pub mod results;
pub mod tasks;

pub use crate::state::AppState;
