use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Note row as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: uuid::Uuid,
    pub name: String,
    pub content: String,
    pub folder_id: Option<uuid::Uuid>,
    pub category_id: Option<uuid::Uuid>,
    pub user_id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for updating a note's content
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdateRequest {
    pub content: String,
}

/// Acknowledgment returned to the REST caller after a successful update.
/// The broadcast to channel subscribers happens independently.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdateResponse {
    pub note_id: String,
    pub content: String,
}
