//! End-to-end tests for the task and done-marker endpoints, driven through
//! the router with `tower::ServiceExt::oneshot`.

mod common;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use common::{create_test_app, send, send_raw};

// =============================================================================
// Create and list
// =============================================================================

#[rstest]
#[tokio::test]
async fn create_and_read() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/tasks", Some(json!({"title": "테스트 작업"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "테스트 작업");
    assert_eq!(body["due_date"], json!(null));

    let (status, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "title": "테스트 작업", "done": false}]));
}

#[rstest]
#[tokio::test]
async fn listing_keeps_insertion_order_and_reports_each_flag() {
    let app = create_test_app();
    for title in ["a", "b", "c"] {
        send(&app, "POST", "/tasks", Some(json!({"title": title}))).await;
    }
    send(&app, "PUT", "/tasks/2/done", None).await;

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(
        body,
        json!([
            {"id": 1, "title": "a", "done": false},
            {"id": 2, "title": "b", "done": true},
            {"id": 3, "title": "c", "done": false},
        ])
    );
}

// =============================================================================
// Done flag
// =============================================================================

#[rstest]
#[tokio::test]
async fn done_flag_scenario() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/tasks", Some(json!({"title": "X"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "X");

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body, json!([{"id": 1, "title": "X", "done": false}]));

    let (status, body) = send(&app, "PUT", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1}));

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["done"], true);

    let (status, body) = send(&app, "PUT", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_DONE");

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["done"], true);

    let (status, _) = send(&app, "DELETE", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["done"], false);

    let (status, body) = send(&app, "DELETE", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[rstest]
#[tokio::test]
async fn unmarking_a_never_done_task_is_not_found() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "X"}))).await;

    let (status, _) = send(&app, "DELETE", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["done"], false);
}

#[rstest]
#[tokio::test]
async fn marking_a_missing_task_is_not_found() {
    let app = create_test_app();

    let (status, body) = send(&app, "PUT", "/tasks/99/done", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task 99 not found");

    // No orphan marker: creating task 1 later still starts out not done.
    send(&app, "POST", "/tasks", Some(json!({"title": "X"}))).await;
    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["done"], false);
}

// =============================================================================
// Due date validation
// =============================================================================

#[rstest]
#[case("2024-12-01", StatusCode::OK)]
#[case("2024-12-32", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("2024/12/01", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("20241201", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("2024-12- 1", StatusCode::UNPROCESSABLE_ENTITY)]
#[case(" 2024-12-1", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("+024-12-01", StatusCode::UNPROCESSABLE_ENTITY)]
#[tokio::test]
async fn due_date(#[case] input: &str, #[case] expected: StatusCode) {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"title": "테스트 작업", "due_date": input})),
    )
    .await;

    assert_eq!(status, expected);
    if expected == StatusCode::OK {
        assert_eq!(body["due_date"], input);
    } else {
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "due_date");
    }
}

#[rstest]
#[tokio::test]
async fn rejected_create_leaves_no_task_behind() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "X", "due_date": "2024-12-32"}))).await;

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[case::missing_title(json!({}))]
#[case::blank_title(json!({"title": "  "}))]
#[case::title_wrong_type(json!({"title": 5}))]
#[case::title_too_long(json!({"title": "a".repeat(1025)}))]
#[tokio::test]
async fn invalid_titles_are_unprocessable(#[case] body: serde_json::Value) {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[rstest]
#[case("application/json", "{not json")]
#[case("text/plain", r#"{"title": "X"}"#)]
#[tokio::test]
async fn unreadable_bodies_are_unprocessable(#[case] content_type: &str, #[case] body: &str) {
    let app = create_test_app();
    let status = send_raw(&app, "POST", "/tasks", content_type, body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Update, get and delete
// =============================================================================

#[rstest]
#[tokio::test]
async fn update_task_title_and_due_date() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "old"}))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/task/1",
        Some(json!({"title": "new", "due_date": "2025-01-15"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "title": "new", "due_date": "2025-01-15"}));

    let (status, body) = send(&app, "GET", "/task/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "new");
}

#[rstest]
#[tokio::test]
async fn update_keeps_completion_state() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "old"}))).await;
    send(&app, "PUT", "/tasks/1/done", None).await;

    send(&app, "PUT", "/task/1", Some(json!({"title": "new"}))).await;

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body, json!([{"id": 1, "title": "new", "done": true}]));
}

#[rstest]
#[case("PUT", Some(json!({"title": "Y"})))]
#[case("DELETE", None)]
#[case("GET", None)]
#[tokio::test]
async fn missing_task_is_not_found(#[case] method: &str, #[case] body: Option<serde_json::Value>) {
    let app = create_test_app();
    let (status, body) = send(&app, method, "/task/1", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task 1 not found");
}

#[rstest]
#[tokio::test]
async fn delete_task_cascades_done_marker() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "X"}))).await;
    send(&app, "PUT", "/tasks/1/done", None).await;

    let (status, body) = send(&app, "DELETE", "/task/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, json!(null));

    let (status, _) = send(&app, "GET", "/task/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/tasks/1/done", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/task/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[case("GET", "/task/abc")]
#[case("PUT", "/task/abc")]
#[case("DELETE", "/task/abc")]
#[case("GET", "/task/99999999999999999999999")]
#[case("PUT", "/tasks/abc/done")]
#[case("DELETE", "/tasks/abc/done")]
#[tokio::test]
async fn malformed_task_id_is_a_json_validation_error(#[case] method: &str, #[case] uri: &str) {
    let app = create_test_app();
    let body = (method == "PUT" && uri.starts_with("/task/")).then(|| json!({"title": "Y"}));

    let (status, body) = send(&app, method, uri, body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "id");
}

// =============================================================================
// Concurrency
// =============================================================================

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mark_done_succeeds_exactly_once() {
    let app = create_test_app();
    send(&app, "POST", "/tasks", Some(json!({"title": "X"}))).await;

    let attempts = (0..8).map(|_| {
        let app = app.clone();
        tokio::spawn(async move { send(&app, "PUT", "/tasks/1/done", None).await.0 })
    });

    let mut ok = 0;
    let mut rejected = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        let status = attempt.await.unwrap();
        if status == StatusCode::OK {
            ok += 1;
        } else if status == StatusCode::BAD_REQUEST {
            rejected += 1;
        } else {
            panic!("unexpected status {status}");
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(rejected, 7);
}
