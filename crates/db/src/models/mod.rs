//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row and,
//! where rows are inserted directly, a create DTO.

pub mod note;
pub mod policy;
