//! Request and response bodies that are not plain model types.
//!
//! Tasks, listing rows and done markers are serialized straight from
//! [`crate::models`].

use serde::{Deserialize, Serialize};

use crate::models::TaskInput;
use crate::validation::{ValidationError, validate_task_input};

/// Body of `POST /tasks` and `PUT /task/{id}`.
///
/// Fields are kept loose (`Option<String>`) so that a missing title or a
/// malformed date is reported by the validation rules with a field name,
/// rather than as an opaque deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TaskRequest {
    pub fn validate(&self) -> Result<TaskInput, ValidationError> {
        validate_task_input(self.title.as_deref(), self.due_date.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
