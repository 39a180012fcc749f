use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{diagnostics, health_check, ready_check, start_editing, stop_editing, update_note};
use crate::routes::auth_middleware::auth_middleware;
use crate::state::AppState;

/// Create API routes
pub fn create_api_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/notes/:id", put(update_note))
        .route("/v1/notes/editing/start", post(start_editing))
        .route("/v1/notes/editing/stop", post(stop_editing))
        .route("/v1/diagnostics", get(diagnostics))
        .route_layer(middleware::from_fn(auth_middleware)) // Applies to all routes added above
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(app_state)
}
