//! PostgreSQL-backed [`PolicyStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use exporter_core::policy::{NewPolicy, Note, Policy, PolicyStore, PolicyWithNotes};
use exporter_core::types::{DbId, Timestamp};

use crate::repositories::{NoteRepo, PolicyRepo};
use crate::DbPool;

/// Adapts the policy and note repositories to the policy service.
///
/// Cloning is cheap: the pool is reference counted.
#[derive(Clone)]
pub struct PgPolicyStore {
    pool: DbPool,
}

impl PgPolicyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyStore for PgPolicyStore {
    type Error = sqlx::Error;

    async fn insert(&self, policy: &NewPolicy) -> Result<DbId, sqlx::Error> {
        PolicyRepo::create(&self.pool, policy).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Policy>, sqlx::Error> {
        let row = PolicyRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(Policy::from))
    }

    async fn list_all(&self) -> Result<Vec<Policy>, sqlx::Error> {
        let rows = PolicyRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Policy::from).collect())
    }

    async fn list_by_start_date_with_notes(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<PolicyWithNotes>, sqlx::Error> {
        let policies = PolicyRepo::list_by_start_date(&self.pool, start, end).await?;
        let ids: Vec<DbId> = policies.iter().map(|p| p.id).collect();

        let mut notes_by_policy: HashMap<DbId, Vec<Note>> = HashMap::new();
        for row in NoteRepo::list_by_policy_ids(&self.pool, &ids).await? {
            notes_by_policy
                .entry(row.policy_id)
                .or_default()
                .push(Note::from(row));
        }

        Ok(policies
            .into_iter()
            .map(|row| PolicyWithNotes {
                notes: notes_by_policy.remove(&row.id).unwrap_or_default(),
                policy: Policy::from(row),
            })
            .collect())
    }
}
