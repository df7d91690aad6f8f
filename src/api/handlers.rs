//! HTTP handlers.
//!
//! Each handler validates its input, then hands one closure to
//! [`Database::transaction`] so the whole request runs in a single
//! transaction that is committed on success and rolled back otherwise.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use super::dto::{HealthResponse, TaskRequest};
use super::error::ApiError;
use crate::database::Database;
use crate::models::{Done, Task, TaskWithCompletion};
use crate::service::{self, ServiceError};

/// Shared handler state: the handle from which every request opens its own
/// transaction.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// `GET /tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskWithCompletion>>, ApiError> {
    let tasks = state.db.transaction(|tx| service::list_tasks(tx)).await?;
    Ok(Json(tasks))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate().map_err(ServiceError::from)?;

    let task = state
        .db
        .transaction(move |tx| service::create_task(tx, &input))
        .await?;
    Ok(Json(task))
}

/// `GET /task/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = path?;
    let task = state.db.transaction(move |tx| service::get_task(tx, id)).await?;
    Ok(Json(task))
}

/// `PUT /task/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let input = request.validate().map_err(ServiceError::from)?;

    let task = state
        .db
        .transaction(move |tx| service::update_task(tx, id, &input))
        .await?;
    Ok(Json(task))
}

/// `DELETE /task/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state
        .db
        .transaction(move |tx| service::delete_task(tx, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /tasks/{id}/done`
pub async fn mark_done(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Done>, ApiError> {
    let Path(id) = path?;
    let done = state
        .db
        .transaction(move |tx| service::mark_done(tx, id))
        .await?;
    Ok(Json(done))
}

/// `DELETE /tasks/{id}/done`
pub async fn unmark_done(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state
        .db
        .transaction(move |tx| service::unmark_done(tx, id))
        .await?;
    Ok(StatusCode::OK)
}
