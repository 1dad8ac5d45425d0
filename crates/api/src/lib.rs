//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET    /task
//!   POST   /task
//!   GET    /task/{id}
//!   POST   /task/{id}
//!   GET    /result
//!   GET    /result/{result_id}[/{detail_id}]

pub mod error;
pub mod handlers;
pub mod payload;
pub mod state;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use handlers::{results, tasks};

pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
///
/// Task routes are also mounted with a trailing slash so `Location`
/// headers resolve as-is.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/task", get(tasks::list).post(tasks::create))
        .route("/task/", get(tasks::list).post(tasks::create))
        .route("/task/{id}", get(tasks::get).post(tasks::execute))
        .route("/task/{id}/", get(tasks::get).post(tasks::execute))
        .route("/result", get(results::index))
        .route("/result/{result_id}", get(results::detail))
        .route("/result/{result_id}/{detail_id}", get(results::detail_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolves on ctrl-c.  If the handler cannot be installed it logs and
/// never resolves, so the caller keeps running instead of stopping at once.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
