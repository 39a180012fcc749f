use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ephemeral editing-presence action. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditingAction {
    Start,
    Stop,
}

/// Request body for the start/stop editing endpoints
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditingRequest {
    pub note_id: String,
    pub user_id: String,
}
