//! Document database boundary.
//!
//! The hosted document database is an opaque collaborator: this module defines
//! the per-document read/write surface the pages rely on, plus an in-memory
//! implementation with the same offline-cache behaviour for dev and tests.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{Document, DocumentPath, DocumentStore, StoreError, StoreErrorCode};
