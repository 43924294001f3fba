//! Handlers for policy entry, lookup and export.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use exporter_core::error::CoreError;
use exporter_core::policy::CreatePolicy;
use exporter_core::types::{deserialize_timestamp, DbId, Timestamp};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `POST /policies/export`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: Timestamp,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_date: Timestamp,
}

/// POST /policies
///
/// Create a policy and return it as stored.
pub async fn create_policy(
    State(state): State<AppState>,
    Json(input): Json<CreatePolicy>,
) -> AppResult<impl IntoResponse> {
    let policy_number = input.policy_number.clone();

    let created = state
        .policy_service()
        .create_policy(input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "policy {policy_number} was inserted but could not be read back"
            )))
        })?;

    tracing::info!(
        policy_id = created.id,
        policy_number = %created.policy_number,
        "Policy created"
    );

    Ok(Json(created))
}

/// GET /policies
///
/// List all policies.
pub async fn list_policies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let policies = state.policy_service().list_policies().await?;
    Ok(Json(policies))
}

/// GET /policies/{id}
///
/// Get a single policy by ID.
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let policy = state
        .policy_service()
        .get_policy(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Policy",
            id,
        }))?;

    Ok(Json(policy))
}

/// POST /policies/export?startDate=&endDate=
///
/// Export policies starting within the inclusive date range, with their
/// notes. A reversed range returns an empty list.
pub async fn export_policies(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let exported = state
        .policy_service()
        .export_policies(params.start_date, params.end_date)
        .await?;

    tracing::info!(
        start_date = %params.start_date,
        end_date = %params.end_date,
        count = exported.len(),
        "Policies exported"
    );

    Ok(Json(exported))
}
