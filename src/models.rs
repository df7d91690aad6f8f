use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum title length in characters, matching the `tasks.title` column.
pub const MAX_TITLE_LENGTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub due_date: Option<NaiveDate>, // ISO 8601: YYYY-MM-DD
}

/// Completion marker. The row's existence is the "done" state; its id is the
/// id of the task it marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Done {
    pub id: i64,
}

/// A task as it appears in the listing, with completion derived from the
/// presence of a `Done` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithCompletion {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

/// Validated input for creating or updating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub due_date: Option<NaiveDate>,
}

impl TaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
