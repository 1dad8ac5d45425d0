use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;
use crate::payload::{self, Payload};
use db::TaskRow;
use queue::{Job, DEFAULT_OPERATION};

/// Upper bound on `times` for a single execute request.
pub const MAX_TIMES: u64 = 100;

/// Canonical location of a task resource.
pub fn task_location(id: Uuid) -> String {
    format!("/task/{id}/")
}

/// `GET /task` — every task, or 404 when there are none.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TaskRow>>, ApiError> {
    debug!("Looking for all tasks");
    let tasks = state.tasks.find_all().await?;
    debug!(count = tasks.len(), "Found tasks");

    if tasks.is_empty() {
        return Err(ApiError::NotFound("no tasks".to_string()));
    }
    Ok(Json(tasks))
}

/// `GET /task/{id}`
#[instrument(skip(state))]
pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<TaskRow>, ApiError> {
    debug!(task_id = %id, "Looking for task");
    match state.tasks.find_by_id(id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound("task not found".to_string())),
    }
}

/// `POST /task` — create-if-absent.
///
/// 201 with the new task, or 409 pointing at the existing one.
#[instrument(skip(state, body))]
pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let payload = payload::raw_to_map(&body);
    let repository = payload::required_str(&payload, "repository")?;
    let name = payload::required_str(&payload, "name")?;

    debug!(repository, name, "Creating new task");
    let (task, created) = state.tasks.create_unique(repository, name).await?;
    let location = task_location(task.id);

    if !created.is_new() {
        return Err(ApiError::Conflict { location });
    }

    info!(task_id = %task.id, repository, name, "task created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(task),
    )
        .into_response())
}

/// Parsed body of `POST /task/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub operation: String,
    pub times: u64,
}

impl ExecuteRequest {
    /// Absent fields take their defaults (`RUN`, once); present but
    /// ill-typed fields are rejected.
    pub fn from_payload(payload: &Payload) -> Result<Self, ApiError> {
        let operation = match payload.get("operation") {
            None | Some(Value::Null) => DEFAULT_OPERATION.to_string(),
            Some(_) => payload::required_str(payload, "operation")?.to_string(),
        };

        let times = match payload.get("times") {
            None | Some(Value::Null) => 1,
            Some(value) => match value.as_u64() {
                Some(n) if (1..=MAX_TIMES).contains(&n) => n,
                _ => {
                    return Err(ApiError::Validation(format!(
                        "'times' must be an integer between 1 and {MAX_TIMES}"
                    )))
                }
            },
        };

        Ok(Self { operation, times })
    }
}

/// Response body of `POST /task/{id}`.
#[derive(Debug, Serialize)]
pub struct EnqueueSummary {
    pub task_id: Uuid,
    pub operation: String,
    pub enqueued: u64,
}

/// `POST /task/{id}` — queue `times` jobs running `operation` on the task.
#[instrument(skip(state, body))]
pub async fn execute(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EnqueueSummary>, ApiError> {
    let request = ExecuteRequest::from_payload(&payload::raw_to_map(&body))?;

    if state.tasks.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound("task not found".to_string()));
    }

    debug!(
        task_id = %id,
        operation = %request.operation,
        times = request.times,
        queue = state.queue.name(),
        "Queuing jobs"
    );
    let jobs = Job::repeated(id, &request.operation, request.times as usize);
    state.queue.enqueue_many(jobs).await?;

    Ok(Json(EnqueueSummary {
        task_id: id,
        operation: request.operation,
        enqueued: request.times,
    }))
}
