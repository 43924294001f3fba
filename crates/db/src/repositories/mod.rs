//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod note_repo;
pub mod policy_repo;

pub use note_repo::NoteRepo;
pub use policy_repo::PolicyRepo;
