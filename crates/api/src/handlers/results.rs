//! Placeholder routes for the results API.

use axum::extract::Path;
use tracing::debug;

/// `GET /result`
pub async fn index() -> &'static str {
    debug!("get: result");
    "Results!"
}

/// `GET /result/{result_id}`
pub async fn detail(Path(result_id): Path<String>) -> &'static str {
    debug!(result_id = %result_id, "get: result detail");
    "Result Details!"
}

/// `GET /result/{result_id}/{detail_id}`
pub async fn detail_item(Path((result_id, detail_id)): Path<(String, String)>) -> &'static str {
    debug!(result_id = %result_id, detail_id = %detail_id, "get: result detail");
    "Result Details!"
}
