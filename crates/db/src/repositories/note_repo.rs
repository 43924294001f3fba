//! Repository for the `notes` table.

use exporter_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, NoteRow};

const COLUMNS: &str = "id, policy_id, text";

/// Provides insert and batch-read operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Attach a note to a policy, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<NoteRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (policy_id, text)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteRow>(&query)
            .bind(input.policy_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// List the notes of every given policy, ordered by policy then note ID.
    ///
    /// An empty `policy_ids` slice returns no rows without querying.
    pub async fn list_by_policy_ids(
        pool: &PgPool,
        policy_ids: &[DbId],
    ) -> Result<Vec<NoteRow>, sqlx::Error> {
        if policy_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE policy_id = ANY($1)
             ORDER BY policy_id ASC, id ASC"
        );
        sqlx::query_as::<_, NoteRow>(&query)
            .bind(policy_ids)
            .fetch_all(pool)
            .await
    }
}
