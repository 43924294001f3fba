//! Domain layer for the policy data exporter.
//!
//! Holds the shared primitive types, the domain error, and the policy
//! service together with the storage trait it drives. Nothing in here knows
//! about HTTP or SQL.

pub mod error;
pub mod policy;
pub mod types;
