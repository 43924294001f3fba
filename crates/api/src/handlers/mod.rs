//! Request handlers.
//!
//! Handlers bind request input, delegate to the policy service and map
//! errors via [`AppError`](crate::error::AppError).

pub mod policies;
