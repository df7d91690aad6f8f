use axum::Router;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Build the router for every task endpoint.
///
/// Update/delete of a task live under the singular `/task/{id}`; the done
/// marker lives under `/tasks/{id}/done`. Clients already depend on both
/// shapes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/task/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route(
            "/tasks/{id}/done",
            put(handlers::mark_done).delete(handlers::unmark_done),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
