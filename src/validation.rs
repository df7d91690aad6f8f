//! Input rules for task titles and due dates.
//!
//! Validation runs before any transaction is opened, so a rejected request
//! never touches the store.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::{MAX_TITLE_LENGTH, TaskInput};
use crate::utils::parse_date;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", summary(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    #[cfg(test)]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a title: present, not blank, at most `MAX_TITLE_LENGTH` characters.
pub fn validate_title(title: Option<&str>) -> Result<String, FieldError> {
    let title = title.ok_or_else(|| FieldError::new("title", "Title is required"))?;

    if title.trim().is_empty() {
        return Err(FieldError::new("title", "Title must not be blank"));
    }

    let length = title.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(FieldError::new(
            "title",
            format!("Title must be at most {MAX_TITLE_LENGTH} characters (got {length})"),
        ));
    }

    Ok(title.to_string())
}

/// Validate an optional due date written as `YYYY-MM-DD`.
///
/// The string must be four year digits, two month digits and two day digits
/// separated by `-`, and name a real calendar day. `2024-12-32`, `2024/12/01`,
/// `20241201`, `2024-1-5` and `2024-12- 1` are all rejected.
pub fn validate_due_date(due_date: Option<&str>) -> Result<Option<NaiveDate>, FieldError> {
    let Some(raw) = due_date else {
        return Ok(None);
    };

    if !is_iso_date_shape(raw) {
        return Err(FieldError::new(
            "due_date",
            format!("Invalid date '{raw}': expected YYYY-MM-DD"),
        ));
    }

    parse_date(raw)
        .map(Some)
        .map_err(|e| FieldError::new("due_date", format!("Invalid date '{raw}': {e}")))
}

/// `YYYY-MM-DD` with ASCII digits only. chrono alone would also take padded
/// fields and a signed year.
fn is_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Validate raw task fields, collecting every field error rather than
/// stopping at the first one.
pub fn validate_task_input(
    title: Option<&str>,
    due_date: Option<&str>,
) -> Result<TaskInput, ValidationError> {
    match (validate_title(title), validate_due_date(due_date)) {
        (Ok(title), Ok(due_date)) => Ok(TaskInput { title, due_date }),
        (title, due_date) => Err(ValidationError {
            errors: [title.err(), due_date.err()].into_iter().flatten().collect(),
        }),
    }
}
