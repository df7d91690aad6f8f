//! Shared helpers for the HTTP integration tests.
//!
//! `#![allow(dead_code)]` because each test file is its own crate and uses
//! only some of these.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use taskboard::Database;
use taskboard::api::{AppState, create_router};

/// Router over a fresh in-memory database.
pub fn create_test_app() -> Router {
    create_router(AppState::new(Database::in_memory().expect("in-memory database")))
}

/// Send one request and return the status plus the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, json)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, content_type: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .expect("valid request");

    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
        .status()
}
