use std::sync::Arc;

use tracing::{error, info};

use crate::db::{NoteStore, NoteStoreError};
use crate::models::{ContentUpdatedMessage, ServerMessage};
use crate::ws::registry::{ChannelRegistry, SubscriberId};

#[derive(Debug)]
pub enum SyncError {
    /// The note does not exist; nothing was persisted or broadcast.
    NotFound,
    /// The write failed; nothing was broadcast.
    Persistence(NoteStoreError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::NotFound => write!(f, "Note not found"),
            SyncError::Persistence(e) => write!(f, "Failed to persist note content: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

/// Persists content updates and fans the new state out to every subscriber
/// of the note's channel. Last writer wins; broadcasts carry full
/// replacement content, never deltas.
pub struct UpdateBroadcaster {
    store: Arc<dyn NoteStore>,
    registry: Arc<ChannelRegistry>,
}

impl UpdateBroadcaster {
    pub fn new(store: Arc<dyn NoteStore>, registry: Arc<ChannelRegistry>) -> Self {
        Self { store, registry }
    }

    /// Apply a content update: fetch the note, overwrite its content, then
    /// broadcast the persisted state to the whole channel. The originating
    /// connection receives its own update back, matching the client
    /// protocol's expectation of authoritative replacements.
    ///
    /// Any failure before the write completes produces zero broadcasts.
    pub async fn update_note(
        &self,
        note_id: &str,
        content: &str,
        origin: Option<&SubscriberId>,
    ) -> Result<(), SyncError> {
        // Existence check first; an unknown note must have no side effects.
        self.store.get_note_by_id(note_id).await.map_err(|e| match e {
            NoteStoreError::NotFound => SyncError::NotFound,
            other => SyncError::Persistence(other),
        })?;

        // Full overwrite, no version check. Concurrent updates race and the
        // last persisted write wins.
        self.store
            .save_note_content(note_id, content)
            .await
            .map_err(|e| match e {
                NoteStoreError::NotFound => SyncError::NotFound,
                other => {
                    error!("Failed to save content for note {}: {}", note_id, other);
                    SyncError::Persistence(other)
                }
            })?;

        let attempts = self.registry.broadcast(
            note_id,
            ServerMessage::ContentUpdated(ContentUpdatedMessage {
                note_id: note_id.to_string(),
                content: content.to_string(),
            }),
            None,
        );
        info!(
            "Note {} updated by {} and broadcast to {} subscriber(s)",
            note_id,
            origin.map(String::as_str).unwrap_or("rest-api"),
            attempts
        );
        Ok(())
    }
}
