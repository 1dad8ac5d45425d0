mod common;

use axum::http::StatusCode;
use db::{InMemoryTaskStore, TaskRow};
use queue::InMemoryQueue;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{app, app_with, TestApp};

async fn create(app: &TestApp, repository: &str, name: &str) -> TaskRow {
    let response = app
        .server
        .post("/task")
        .json(&json!({ "repository": repository, "name": name }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<TaskRow>()
}

// ============================================================
// GET /task
// ============================================================

#[tokio::test]
async fn listing_an_empty_store_is_404() {
    let app = app();
    let response = app.server.get("/task").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "not_found");
}

#[tokio::test]
async fn listing_returns_every_task() {
    let app = app();
    create(&app, "library/redis", "warm").await;
    create(&app, "library/nginx", "warm").await;

    let response = app.server.get("/task").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let tasks = response.json::<Vec<TaskRow>>();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().any(|t| t.repository == "library/nginx"));
}

#[tokio::test]
async fn listing_with_a_broken_store_is_500() {
    let app = app_with(InMemoryTaskStore::failing("db down"), InMemoryQueue::default());
    let response = app.server.get("/task").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    // Backend detail stays in the logs.
    assert!(!response.text().contains("db down"));
}

// ============================================================
// GET /task/{id}
// ============================================================

#[tokio::test]
async fn created_task_can_be_fetched_by_id() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app.server.get(&format!("/task/{}", task.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<TaskRow>(), task);
}

#[tokio::test]
async fn unknown_id_is_404() {
    let app = app();
    let response = app.server.get(&format!("/task/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_uuid_id_is_400() {
    let app = app();
    let response = app.server.get("/task/42").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetching_by_id_with_a_broken_store_is_500() {
    let app = app_with(InMemoryTaskStore::failing("db down"), InMemoryQueue::default());
    let response = app.server.get(&format!("/task/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================
// POST /task
// ============================================================

#[tokio::test]
async fn create_sets_location_to_the_new_task() {
    let app = app();
    let response = app
        .server
        .post("/task")
        .json(&json!({ "repository": "library/redis", "name": "warm" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let task = response.json::<TaskRow>();
    assert_eq!(task.repository, "library/redis");
    assert_eq!(task.name, "warm");

    let location = response.header("location");
    assert_eq!(location.to_str().unwrap(), format!("/task/{}/", task.id));

    // The location resolves.
    let fetched = app.server.get(location.to_str().unwrap()).await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_create_is_409_and_adds_no_row() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app
        .server
        .post("/task")
        .json(&json!({ "repository": "library/redis", "name": "warm" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        format!("/task/{}/", task.id)
    );
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn malformed_json_is_rejected_without_touching_the_store() {
    let app = app();
    let response = app
        .server
        .post("/task")
        .text("{\"repository\": \"library/redis\", ")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "validation_error");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn missing_name_is_400() {
    let app = app();
    let response = app
        .server
        .post("/task")
        .json(&json!({ "repository": "library/redis" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().contains("'name' is required"));
}

#[tokio::test]
async fn create_with_a_broken_store_is_500() {
    let app = app_with(InMemoryTaskStore::failing("db down"), InMemoryQueue::default());
    let response = app
        .server
        .post("/task")
        .json(&json!({ "repository": "library/redis", "name": "warm" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================
// POST /task/{id}
// ============================================================

#[tokio::test]
async fn execute_enqueues_one_job_per_time() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app
        .server
        .post(&format!("/task/{}", task.id))
        .json(&json!({ "operation": "PULL", "times": 3 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["enqueued"], 3);

    let jobs = app.queue.enqueued();
    assert_eq!(jobs.len(), 3);
    assert!(jobs
        .iter()
        .all(|j| j.task_id == task.id && j.operation == "PULL"));
}

#[tokio::test]
async fn execute_without_body_runs_once() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app.server.post(&format!("/task/{}/", task.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let jobs = app.queue.enqueued();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].operation, "RUN");
    assert_eq!(jobs[0].task_id, task.id);
}

#[tokio::test]
async fn execute_with_malformed_body_falls_back_to_defaults() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app
        .server
        .post(&format!("/task/{}", task.id))
        .text("times=3")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.queue.enqueued().len(), 1);
}

#[tokio::test]
async fn execute_rejects_out_of_range_times() {
    let app = app();
    let task = create(&app, "library/redis", "warm").await;

    let response = app
        .server
        .post(&format!("/task/{}", task.id))
        .json(&json!({ "times": 0 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.queue.enqueued().is_empty());
}

#[tokio::test]
async fn execute_on_unknown_task_is_404() {
    let app = app();
    let response = app
        .server
        .post(&format!("/task/{}", Uuid::new_v4()))
        .json(&json!({ "times": 2 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(app.queue.enqueued().is_empty());
}

#[tokio::test]
async fn execute_with_queue_down_is_503() {
    let store = InMemoryTaskStore::new();
    let (task, _) = db::TaskStore::create_unique(&store, "library/redis", "warm")
        .await
        .unwrap();
    let app = app_with(store, InMemoryQueue::unavailable("redis down"));

    let response = app.server.post(&format!("/task/{}", task.id)).await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["code"], "backend_unavailable");
}
