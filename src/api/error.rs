//! HTTP error responses.
//!
//! Every failure is rendered as `{"code", "message", "details"?}` with the
//! status chosen from the rule that failed.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::service::ServiceError;
use crate::validation::FieldError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Status code plus JSON body, returned from handlers as the `Err` side.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// 422 Unprocessable Entity with field-level details.
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        let mut error = Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message);
        error.body.details = Some(details);
        error
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Completing an already complete task. Reported as 400 rather than 409,
    /// which is the convention clients of this API rely on.
    pub fn already_done(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ALREADY_DONE", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(validation) => {
                ApiError::validation("Validation failed", validation.errors)
            }
            ServiceError::NotFound { .. } => ApiError::not_found(error.to_string()),
            ServiceError::AlreadyDone(_) => ApiError::already_done(error.to_string()),
            ServiceError::Database(ref db_error) => {
                // Details stay in the log, not in the response.
                tracing::error!(error = %db_error, "Database failure while handling request");
                ApiError::internal()
            }
        }
    }
}

/// Unreadable JSON bodies (syntax errors, missing fields, wrong types or
/// content type) are all reported as 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        ApiError::validation(
            "Invalid request body",
            vec![FieldError::new("body", rejection.body_text())],
        )
    }
}

/// Task ids that do not parse as an integer are reported as 422 on the `id`
/// field, keeping them apart from the 400 `ALREADY_DONE` conflict.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected path parameter");
        ApiError::validation(
            "Invalid task id",
            vec![FieldError::new("id", rejection.body_text())],
        )
    }
}
