use exporter_core::policy::PolicyService;
use exporter_db::store::PgPolicyStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: exporter_db::DbPool,
}

impl AppState {
    /// A policy service backed by this state's pool.
    pub fn policy_service(&self) -> PolicyService<PgPolicyStore> {
        PolicyService::new(PgPolicyStore::new(self.pool.clone()))
    }
}
