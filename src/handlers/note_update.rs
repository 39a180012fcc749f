use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::models::{ErrorResponse, NoteUpdateRequest, NoteUpdateResponse};
use crate::state::AppState;
use crate::sync::SyncError;

/// Overwrite a note's content and fan the new state out to channel
/// subscribers. The response acknowledges the persisted write; delivery to
/// subscribers is best-effort and independent of this request.
#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    request_body = NoteUpdateRequest,
    params(
        ("id" = String, Path, description = "Note id")
    ),
    responses(
        (status = 200, description = "Note content updated", body = NoteUpdateResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Failed to persist note content", body = ErrorResponse)
    )
)]
pub async fn update_note(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<String>,
    Path(note_id): Path<String>,
    Json(body): Json<NoteUpdateRequest>,
) -> Result<(StatusCode, Json<NoteUpdateResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!("User {} updating note {} via REST", user_id, note_id);

    match app_state
        .broadcaster
        .update_note(&note_id, &body.content, None)
        .await
    {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(NoteUpdateResponse {
                note_id,
                content: body.content,
            }),
        )),
        Err(SyncError::NotFound) => {
            let status = StatusCode::NOT_FOUND;
            Err((
                status,
                Json(ErrorResponse {
                    code: status.as_u16(),
                    status: status.to_string(),
                    error: format!("Note '{}' not found", note_id),
                }),
            ))
        }
        Err(SyncError::Persistence(e)) => {
            error!("Failed to persist content for note {}: {}", note_id, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            Err((
                status,
                Json(ErrorResponse {
                    code: status.as_u16(),
                    status: status.to_string(),
                    error: format!("Error updating note '{}'", note_id),
                }),
            ))
        }
    }
}
