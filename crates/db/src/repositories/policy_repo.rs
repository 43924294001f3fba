//! Repository for the `policies` table.

use exporter_core::policy::NewPolicy;
use exporter_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::policy::PolicyRow;

/// Column list shared across queries.
const COLUMNS: &str = "id, policy_number, premium, start_date";

/// Provides insert and read operations for policies.
pub struct PolicyRepo;

impl PolicyRepo {
    /// Insert a new policy, returning the generated id.
    pub async fn create(pool: &PgPool, input: &NewPolicy) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO policies (policy_number, premium, start_date)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.policy_number)
        .bind(input.premium)
        .bind(input.start_date)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Find a policy by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PolicyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM policies WHERE id = $1");
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all policies, ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<PolicyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM policies ORDER BY id ASC");
        sqlx::query_as::<_, PolicyRow>(&query).fetch_all(pool).await
    }

    /// List policies whose start date lies in `[start, end]` (both inclusive),
    /// ordered by start date then ID.
    pub async fn list_by_start_date(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<PolicyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM policies
             WHERE start_date >= $1 AND start_date <= $2
             ORDER BY start_date ASC, id ASC"
        );
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Count all stored policies.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM policies")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
