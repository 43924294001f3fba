//! Liveness and readiness of the policy service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when the policy endpoints can serve requests, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub database_reachable: bool,
    /// Both the `policies` and `notes` tables exist.
    pub schema_ready: bool,
}

/// GET /health
///
/// Answers 503 while the database is unreachable or the policy tables have
/// not been created, so a load balancer keeps traffic away until startup has
/// run `ensure_schema`.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_reachable = exporter_db::health_check(&state.pool).await.is_ok();
    let schema_ready = if database_reachable {
        exporter_db::schema_ready(&state.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Schema lookup failed");
                false
            })
    } else {
        false
    };

    let (code, status) = if schema_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database_reachable,
            schema_ready,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
