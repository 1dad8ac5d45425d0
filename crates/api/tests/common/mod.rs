//! Shared setup: the real router over in-memory backends.

#![allow(dead_code)]

use std::sync::Arc;

use api::{router, AppState};
use axum_test::TestServer;
use db::InMemoryTaskStore;
use queue::InMemoryQueue;

pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryTaskStore,
    pub queue: InMemoryQueue,
}

pub fn app_with(store: InMemoryTaskStore, queue: InMemoryQueue) -> TestApp {
    let state = AppState::new(Arc::new(store.clone()), Arc::new(queue.clone()));
    let server = TestServer::new(router(state)).expect("failed to build test server");
    TestApp {
        server,
        store,
        queue,
    }
}

pub fn app() -> TestApp {
    app_with(InMemoryTaskStore::new(), InMemoryQueue::default())
}
