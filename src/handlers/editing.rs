use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::models::EditingRequest;
use crate::state::AppState;

/// Announce that a user started editing a note. Ephemeral: the event is
/// relayed to current subscribers and forgotten.
#[utoipa::path(
    post,
    path = "/api/v1/notes/editing/start",
    request_body = EditingRequest,
    responses(
        (status = 200, description = "Editing start announced")
    )
)]
pub async fn start_editing(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<EditingRequest>,
) -> (StatusCode, &'static str) {
    debug!("User {} started editing note {}", body.user_id, body.note_id);
    app_state.presence.start_editing(&body.note_id, &body.user_id);
    (StatusCode::OK, "Started editing")
}

/// Announce that a user stopped editing a note.
#[utoipa::path(
    post,
    path = "/api/v1/notes/editing/stop",
    request_body = EditingRequest,
    responses(
        (status = 200, description = "Editing stop announced")
    )
)]
pub async fn stop_editing(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<EditingRequest>,
) -> (StatusCode, &'static str) {
    debug!("User {} stopped editing note {}", body.user_id, body.note_id);
    app_state.presence.stop_editing(&body.note_id, &body.user_id);
    (StatusCode::OK, "Stopped editing")
}
