use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use tracing::info;
use uuid::Uuid;

use crate::models::Note;

#[derive(Debug)]
pub enum NoteStoreError {
    /// The note id has no backing record.
    NotFound,
    /// The storage read or write failed.
    Database(SqlxError),
}

impl std::fmt::Display for NoteStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteStoreError::NotFound => write!(f, "Note not found"),
            NoteStoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for NoteStoreError {}

impl From<SqlxError> for NoteStoreError {
    fn from(e: SqlxError) -> Self {
        match e {
            SqlxError::RowNotFound => NoteStoreError::NotFound,
            other => NoteStoreError::Database(other),
        }
    }
}

/// Storage-facing interface the update broadcaster depends on. Single-row
/// read/write semantics only; the backing CRUD service owns everything else.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn get_note_by_id(&self, note_id: &str) -> Result<Note, NoteStoreError>;
    async fn save_note_content(&self, note_id: &str, content: &str) -> Result<(), NoteStoreError>;
}

/// Postgres-backed note store
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Create a new store with its own connection pool
    pub async fn connect(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    pub fn _pool(&self) -> &PgPool {
        &self.pool
    }

    // Note ids are opaque strings on the wire; anything that does not parse
    // as a uuid cannot name an existing row.
    fn parse_id(note_id: &str) -> Result<Uuid, NoteStoreError> {
        Uuid::parse_str(note_id).map_err(|_| NoteStoreError::NotFound)
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn get_note_by_id(&self, note_id: &str) -> Result<Note, NoteStoreError> {
        let id = Self::parse_id(note_id)?;

        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, name, content, folder_id, category_id, user_id, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        note.ok_or(NoteStoreError::NotFound)
    }

    async fn save_note_content(&self, note_id: &str, content: &str) -> Result<(), NoteStoreError> {
        let id = Self::parse_id(note_id)?;

        let result = sqlx::query(
            r#"
            UPDATE notes
            SET content = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(content)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(NoteStoreError::NotFound);
        }
        info!("Note {} content saved ({} bytes)", note_id, content.len());
        Ok(())
    }
}
