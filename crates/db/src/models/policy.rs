//! Policy row model.

use exporter_core::policy::Policy;
use exporter_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `policies` table.
#[derive(Debug, Clone, FromRow)]
pub struct PolicyRow {
    pub id: DbId,
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: Timestamp,
}

impl From<PolicyRow> for Policy {
    fn from(row: PolicyRow) -> Self {
        Self {
            id: row.id,
            policy_number: row.policy_number,
            premium: row.premium,
            start_date: row.start_date,
        }
    }
}
