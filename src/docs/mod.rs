use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    DiagnosticsResponse, EditingAction, EditingRequest, ErrorResponse, HealthResponse,
    NoteUpdateRequest, NoteUpdateResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::health::ready_check,
        handlers::note_update::update_note,
        handlers::editing::start_editing,
        handlers::editing::stop_editing,
        handlers::diagnostics::diagnostics,
    ),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        NoteUpdateRequest,
        NoteUpdateResponse,
        EditingRequest,
        EditingAction,
        DiagnosticsResponse,
    )),
    tags(
        (name = "notehub", description = "Collaborative note synchronization API")
    )
)]
pub struct ApiDoc;
