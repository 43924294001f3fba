//! Policy records, their transfer shapes, and the service that maps between
//! them.
//!
//! The service owns no storage of its own: every read and write goes through
//! a [`PolicyStore`], so the HTTP layer can run against PostgreSQL while the
//! unit tests below run against an in-memory store.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{deserialize_timestamp, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// A stored policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub id: DbId,
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: Timestamp,
}

/// A stored note, owned by exactly one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: DbId,
    pub policy_id: DbId,
    pub text: String,
}

/// A policy that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicy {
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: Timestamp,
}

/// A policy loaded together with all of its notes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyWithNotes {
    pub policy: Policy,
    pub notes: Vec<Note>,
}

// ---------------------------------------------------------------------------
// Transfer shapes
// ---------------------------------------------------------------------------

/// Request body for `POST /policies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicy {
    pub policy_number: String,
    pub premium: Decimal,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: Timestamp,
}

/// Read projection of a policy. Notes are not included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyView {
    pub id: DbId,
    pub policy_number: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub premium: Decimal,
    pub start_date: Timestamp,
}

/// Export projection of a policy with its notes flattened to their text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportView {
    pub policy_number: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub premium: Decimal,
    pub start_date: Timestamp,
    pub notes: Vec<String>,
}

impl From<CreatePolicy> for NewPolicy {
    fn from(input: CreatePolicy) -> Self {
        Self {
            policy_number: input.policy_number,
            premium: input.premium,
            start_date: input.start_date,
        }
    }
}

impl From<Policy> for PolicyView {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id,
            policy_number: policy.policy_number,
            premium: policy.premium,
            start_date: policy.start_date,
        }
    }
}

impl From<PolicyWithNotes> for ExportView {
    fn from(loaded: PolicyWithNotes) -> Self {
        let PolicyWithNotes { policy, notes } = loaded;
        Self {
            policy_number: policy.policy_number,
            premium: policy.premium,
            start_date: policy.start_date,
            notes: notes.into_iter().map(|n| n.text).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage seam
// ---------------------------------------------------------------------------

/// Persistence operations the policy service depends on.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a new policy and return its generated id.
    async fn insert(&self, policy: &NewPolicy) -> Result<DbId, Self::Error>;

    /// Look up one policy. Zero matching rows is `Ok(None)`.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Policy>, Self::Error>;

    async fn list_all(&self) -> Result<Vec<Policy>, Self::Error>;

    /// Policies with `start <= start_date <= end`, each with its notes.
    async fn list_by_start_date_with_notes(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<PolicyWithNotes>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Maps transfer shapes to stored records and back.
pub struct PolicyService<S> {
    store: S,
}

impl<S: PolicyStore> PolicyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store a new policy and return it as read back from the store.
    ///
    /// `Ok(None)` means the row could not be re-read after the insert, which
    /// indicates an inconsistent store rather than bad input.
    pub async fn create_policy(&self, input: CreatePolicy) -> Result<Option<PolicyView>, S::Error> {
        let id = self.store.insert(&NewPolicy::from(input)).await?;
        let created = self.store.find_by_id(id).await?;
        Ok(created.map(PolicyView::from))
    }

    pub async fn list_policies(&self) -> Result<Vec<PolicyView>, S::Error> {
        let policies = self.store.list_all().await?;
        Ok(policies.into_iter().map(PolicyView::from).collect())
    }

    pub async fn get_policy(&self, id: DbId) -> Result<Option<PolicyView>, S::Error> {
        let policy = self.store.find_by_id(id).await?;
        Ok(policy.map(PolicyView::from))
    }

    /// Export every policy starting within the closed range `[start, end]`.
    ///
    /// A reversed range matches nothing and yields an empty list.
    pub async fn export_policies(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ExportView>, S::Error> {
        let loaded = self.store.list_by_start_date_with_notes(start, end).await?;
        Ok(loaded.into_iter().map(ExportView::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Mutex;

    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    /// Vector-backed store. Ids start at 1 and increase by one per insert.
    #[derive(Default)]
    struct MemoryStore {
        policies: Mutex<Vec<Policy>>,
        notes: Mutex<Vec<Note>>,
    }

    impl MemoryStore {
        fn add_note(&self, policy_id: DbId, text: &str) {
            let mut notes = self.notes.lock().unwrap();
            let id = notes.len() as DbId + 1;
            notes.push(Note {
                id,
                policy_id,
                text: text.to_string(),
            });
        }
    }

    #[async_trait]
    impl PolicyStore for MemoryStore {
        type Error = Infallible;

        async fn insert(&self, policy: &NewPolicy) -> Result<DbId, Infallible> {
            let mut policies = self.policies.lock().unwrap();
            let id = policies.len() as DbId + 1;
            policies.push(Policy {
                id,
                policy_number: policy.policy_number.clone(),
                premium: policy.premium,
                start_date: policy.start_date,
            });
            Ok(id)
        }

        async fn find_by_id(&self, id: DbId) -> Result<Option<Policy>, Infallible> {
            let policies = self.policies.lock().unwrap();
            Ok(policies.iter().find(|p| p.id == id).cloned())
        }

        async fn list_all(&self) -> Result<Vec<Policy>, Infallible> {
            Ok(self.policies.lock().unwrap().clone())
        }

        async fn list_by_start_date_with_notes(
            &self,
            start: Timestamp,
            end: Timestamp,
        ) -> Result<Vec<PolicyWithNotes>, Infallible> {
            let policies = self.policies.lock().unwrap();
            let notes = self.notes.lock().unwrap();
            Ok(policies
                .iter()
                .filter(|p| p.start_date >= start && p.start_date <= end)
                .map(|p| PolicyWithNotes {
                    policy: p.clone(),
                    notes: notes
                        .iter()
                        .filter(|n| n.policy_id == p.id)
                        .cloned()
                        .collect(),
                })
                .collect())
        }
    }

    /// Store that accepts inserts but never finds anything afterwards.
    struct ForgetfulStore;

    #[async_trait]
    impl PolicyStore for ForgetfulStore {
        type Error = Infallible;

        async fn insert(&self, _policy: &NewPolicy) -> Result<DbId, Infallible> {
            Ok(7)
        }

        async fn find_by_id(&self, _id: DbId) -> Result<Option<Policy>, Infallible> {
            Ok(None)
        }

        async fn list_all(&self) -> Result<Vec<Policy>, Infallible> {
            Ok(Vec::new())
        }

        async fn list_by_start_date_with_notes(
            &self,
            _start: Timestamp,
            _end: Timestamp,
        ) -> Result<Vec<PolicyWithNotes>, Infallible> {
            Ok(Vec::new())
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn input(number: &str, premium: Decimal, start: Timestamp) -> CreatePolicy {
        CreatePolicy {
            policy_number: number.to_string(),
            premium,
            start_date: start,
        }
    }

    // -- create / get --------------------------------------------------------

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let service = PolicyService::new(MemoryStore::default());

        let created = service
            .create_policy(input("P-1", dec!(100.00), day(2024, 1, 1)))
            .await
            .unwrap()
            .expect("created policy should be readable");

        let fetched = service.get_policy(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.policy_number, "P-1");
        assert_eq!(fetched.premium, dec!(100.00));
        assert_eq!(fetched.start_date, day(2024, 1, 1));
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let service = PolicyService::new(MemoryStore::default());
        assert_eq!(service.get_policy(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_reports_none_when_reread_misses() {
        let service = PolicyService::new(ForgetfulStore);
        let result = service
            .create_policy(input("P-1", dec!(1), day(2024, 1, 1)))
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    // -- list ----------------------------------------------------------------

    #[tokio::test]
    async fn list_returns_every_created_policy() {
        let service = PolicyService::new(MemoryStore::default());
        service
            .create_policy(input("A", dec!(10), day(2024, 1, 1)))
            .await
            .unwrap();
        service
            .create_policy(input("B", dec!(20), day(2024, 2, 1)))
            .await
            .unwrap();

        let mut numbers: Vec<_> = service
            .list_policies()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.policy_number)
            .collect();
        numbers.sort();
        assert_eq!(numbers, ["A", "B"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let service = PolicyService::new(MemoryStore::default());
        assert!(service.list_policies().await.unwrap().is_empty());
    }

    // -- export --------------------------------------------------------------

    #[tokio::test]
    async fn export_filters_closed_range_and_flattens_notes() {
        let store = MemoryStore::default();
        store.add_note(1, "first");
        store.add_note(1, "second");
        let service = PolicyService::new(store);

        service
            .create_policy(input("IN-START", dec!(1.50), day(2024, 1, 1)))
            .await
            .unwrap();
        service
            .create_policy(input("IN-END", dec!(2), day(2024, 1, 31)))
            .await
            .unwrap();
        service
            .create_policy(input("OUT", dec!(3), day(2024, 2, 1)))
            .await
            .unwrap();

        let exported = service
            .export_policies(day(2024, 1, 1), day(2024, 1, 31))
            .await
            .unwrap();

        assert_eq!(exported.len(), 2);
        let start = exported
            .iter()
            .find(|e| e.policy_number == "IN-START")
            .unwrap();
        assert_eq!(start.notes, ["first", "second"]);
        assert_eq!(start.premium, dec!(1.50));

        let end = exported
            .iter()
            .find(|e| e.policy_number == "IN-END")
            .unwrap();
        assert!(end.notes.is_empty());
    }

    #[tokio::test]
    async fn export_with_reversed_range_is_empty() {
        let service = PolicyService::new(MemoryStore::default());
        service
            .create_policy(input("P-1", dec!(1), day(2024, 1, 15)))
            .await
            .unwrap();

        let exported = service
            .export_policies(day(2024, 1, 31), day(2024, 1, 1))
            .await
            .unwrap();
        assert!(exported.is_empty());
    }

    // -- serialization -------------------------------------------------------

    #[test]
    fn create_policy_accepts_camel_case_and_bare_date() {
        let parsed: CreatePolicy = serde_json::from_str(
            r#"{"policyNumber":"P-1","premium":100.00,"startDate":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(parsed.policy_number, "P-1");
        assert_eq!(parsed.premium, dec!(100));
        assert_eq!(parsed.start_date, day(2024, 1, 1));
    }

    #[test]
    fn export_view_serializes_notes_as_array_and_premium_as_number() {
        let view = ExportView::from(PolicyWithNotes {
            policy: Policy {
                id: 1,
                policy_number: "P-1".to_string(),
                premium: dec!(99.5),
                start_date: day(2024, 1, 1),
            },
            notes: Vec::new(),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["policyNumber"], "P-1");
        assert_eq!(json["premium"], 99.5);
        assert_eq!(json["notes"], serde_json::json!([]));
        assert!(json.get("id").is_none());
    }

    #[test]
    fn premium_serializes_without_float_rounding() {
        let view = PolicyView::from(Policy {
            id: 7,
            policy_number: "P-7".to_string(),
            premium: dec!(12345678901234567.891),
            start_date: day(2024, 1, 1),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["premium"].is_number());
        assert_eq!(json["premium"].to_string(), "12345678901234567.891");
    }

    #[test]
    fn create_policy_premium_parses_exactly_from_number_or_string() {
        let from_number: CreatePolicy = serde_json::from_str(
            r#"{"policyNumber":"P","premium":0.1234567890123456789,"startDate":"2024-01-01"}"#,
        )
        .unwrap();
        let from_string: CreatePolicy = serde_json::from_str(
            r#"{"policyNumber":"P","premium":"0.1234567890123456789","startDate":"2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(from_number.premium, dec!(0.1234567890123456789));
        assert_eq!(from_string.premium, dec!(0.1234567890123456789));
    }
}
