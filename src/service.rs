//! Existence and completion rules shared by the HTTP handlers and the CLI.
//!
//! Each function expects to run inside one transaction (see
//! [`Database::transaction`](crate::database::Database::transaction)); an
//! error from any step rolls back the whole request.
//!
//! Completion is a two-state machine per task, `incomplete -> complete` via
//! [`mark_done`] and `complete -> incomplete` via [`unmark_done`]. Neither
//! transition is idempotent: repeating it is reported, not ignored.

use rusqlite::Connection;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::done_store::DoneStore;
use crate::models::{Done, Task, TaskInput, TaskWithCompletion};
use crate::task_store::TaskStore;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Task {0} is already done")]
    AlreadyDone(i64),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    fn task_not_found(id: i64) -> Self {
        ServiceError::NotFound { entity: "Task", id }
    }

    fn done_not_found(id: i64) -> Self {
        ServiceError::NotFound { entity: "Done", id }
    }
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<TaskWithCompletion>, ServiceError> {
    Ok(TaskStore::new(conn).list_with_completion()?)
}

pub fn create_task(conn: &Connection, input: &TaskInput) -> Result<Task, ServiceError> {
    let task = TaskStore::new(conn).create(input)?;
    tracing::info!(task_id = task.id, "Created task");
    Ok(task)
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task, ServiceError> {
    TaskStore::new(conn)
        .get(id)?
        .ok_or_else(|| ServiceError::task_not_found(id))
}

pub fn update_task(conn: &Connection, id: i64, input: &TaskInput) -> Result<Task, ServiceError> {
    let tasks = TaskStore::new(conn);
    let original = tasks.get(id)?.ok_or_else(|| ServiceError::task_not_found(id))?;
    Ok(tasks.update(input, original)?)
}

/// Delete a task; its done marker goes with it.
pub fn delete_task(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    let tasks = TaskStore::new(conn);
    let original = tasks.get(id)?.ok_or_else(|| ServiceError::task_not_found(id))?;
    tasks.delete(original)?;
    tracing::info!(task_id = id, "Deleted task");
    Ok(())
}

/// Transition a task to complete.
///
/// Fails with `NotFound` when the task does not exist (no orphan markers) and
/// with `AlreadyDone` when a marker is already present.
pub fn mark_done(conn: &Connection, task_id: i64) -> Result<Done, ServiceError> {
    TaskStore::new(conn)
        .get(task_id)?
        .ok_or_else(|| ServiceError::task_not_found(task_id))?;

    let dones = DoneStore::new(conn);
    if dones.get(task_id)?.is_some() {
        tracing::warn!(task_id, "Rejected marking an already done task");
        return Err(ServiceError::AlreadyDone(task_id));
    }

    dones.create(task_id).map_err(|e| {
        if e.is_constraint_violation() {
            ServiceError::AlreadyDone(task_id)
        } else {
            ServiceError::Database(e)
        }
    })
}

/// Transition a task back to incomplete. Fails with `NotFound` when there is
/// no marker to remove.
pub fn unmark_done(conn: &Connection, task_id: i64) -> Result<(), ServiceError> {
    let dones = DoneStore::new(conn);
    let Some(done) = dones.get(task_id)? else {
        tracing::warn!(task_id, "Rejected clearing a task that is not done");
        return Err(ServiceError::done_not_found(task_id));
    };
    dones.delete(done)?;
    Ok(())
}
