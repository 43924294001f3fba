//! Route definitions for policies.
//!
//! Mounted at `/policies` by the app router.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::policies;
use crate::state::AppState;

/// Policy routes.
///
/// ```text
/// GET    /                   -> list_policies
/// POST   /                   -> create_policy
/// POST   /export             -> export_policies (?startDate, endDate)
/// GET    /{id}               -> get_policy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(policies::list_policies).post(policies::create_policy),
        )
        .route("/export", post(policies::export_policies))
        .route("/{id}", get(policies::get_policy))
}
