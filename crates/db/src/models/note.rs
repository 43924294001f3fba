//! Note row model.

use exporter_core::policy::Note;
use exporter_core::types::DbId;
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: DbId,
    pub policy_id: DbId,
    pub text: String,
}

/// DTO for attaching a note to an existing policy.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub policy_id: DbId,
    pub text: String,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            policy_id: row.policy_id,
            text: row.text,
        }
    }
}
