//! PostgreSQL storage for policies and their notes.
//!
//! - [`models`]: `FromRow` row structs and insert DTOs
//! - [`repositories`]: zero-sized repos with async query methods
//! - [`store`]: the [`PolicyStore`](exporter_core::policy::PolicyStore)
//!   implementation the API hands to the policy service
//! - [`seed`]: optional sample data for local development

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Tables are created on demand; there is no migration history.
const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS policies (
        id            BIGSERIAL   PRIMARY KEY,
        policy_number TEXT        NOT NULL,
        premium       NUMERIC     NOT NULL,
        start_date    TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS notes (
        id        BIGSERIAL PRIMARY KEY,
        text      TEXT      NOT NULL,
        policy_id BIGINT    NOT NULL REFERENCES policies (id) ON DELETE CASCADE
    )",
];

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Tables the policy service reads and writes.
const TABLES: [&str; 2] = ["policies", "notes"];

/// Whether every table in [`TABLES`] exists in the current schema.
pub async fn schema_ready(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let (present,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_name::text = ANY($1)",
    )
    .bind(&TABLES[..])
    .fetch_one(pool)
    .await?;
    Ok(present == TABLES.len() as i64)
}

/// Create the `policies` and `notes` tables if they do not exist yet.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::debug!(statements = SCHEMA.len(), "Schema ensured");
    Ok(())
}
