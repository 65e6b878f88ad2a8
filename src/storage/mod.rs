//! Backend implementations
//!
//! Production hosts implement [`crate::core::ListBackend`] over their own
//! transport; this module ships the in-memory reference used for tests and
//! development.

pub mod in_memory;

pub use in_memory::{InMemoryBackend, Queryable, contains_ci};
