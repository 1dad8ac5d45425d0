//! Shared handler state.

use std::sync::Arc;

use db::TaskStore;
use queue::JobQueue;

/// Backends every handler can reach.  Built once at startup; handlers only
/// ever read it.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
    pub queue: Arc<dyn JobQueue>,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskStore>, queue: Arc<dyn JobQueue>) -> Self {
        Self { tasks, queue }
    }
}
