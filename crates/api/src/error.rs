//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`; the conversion to a response
//! happens here so status selection lives in one place.  Backend detail is
//! logged, never sent to the caller.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use db::DbError;
use queue::QueueError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A task with the same key already exists at `location`.
    #[error("task already exists at {location}")]
    Conflict { location: String },

    /// The request payload is missing or has bad fields.
    #[error("{0}")]
    Validation(String),

    /// The database failed.
    #[error("internal error: {0}")]
    Internal(String),

    /// The job queue failed.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// Machine-readable error code.
    pub code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
            ApiError::BackendUnavailable(_) => "backend_unavailable",
        }
    }

    /// Message safe to show the caller.
    fn client_message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::Validation(msg) => msg.clone(),
            ApiError::Conflict { .. } => "task already exists".to_string(),
            ApiError::Internal(_) => "internal server error".to_string(),
            ApiError::BackendUnavailable(_) => "job queue unavailable".to_string(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("task not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        ApiError::BackendUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(_) | ApiError::BackendUnavailable(_) => {
                error!(error = %self, status = status.as_u16(), "request failed");
            }
            _ => debug!(error = %self, status = status.as_u16(), "request rejected"),
        }

        let body = Json(ErrorBody {
            error: self.client_message(),
            code: self.code(),
        });

        match self {
            ApiError::Conflict { location } => {
                (status, [(header::LOCATION, location)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_not_found_maps_to_404() {
        let err = ApiError::from(DbError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_db_failures_map_to_500_without_leaking_detail() {
        let err = ApiError::from(DbError::Unavailable("pg at 10.0.0.3 refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn vanished_conflicting_row_is_500_not_404() {
        let err = ApiError::from(DbError::ConflictingRowMissing {
            repository: "library/redis".into(),
            name: "warm".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn queue_failures_map_to_503() {
        let err = ApiError::from(QueueError::Unavailable("redis down".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "backend_unavailable");
    }

    #[test]
    fn conflict_response_carries_location() {
        let response = ApiError::Conflict {
            location: "/task/abc/".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers()[header::LOCATION], "/task/abc/");
    }
}
