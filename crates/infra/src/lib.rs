//! Infrastructure layer: config, hosted auth/document-database clients,
//! offline handling, and record persistence.

pub mod auth_client;
pub mod config;
pub mod document_store;
pub mod errors;
pub mod offline;
pub mod repository;

pub use auth_client::{AuthClient, AuthError, InMemoryAuthClient};
pub use config::{AppConfig, ConfigError};
pub use document_store::{Document, DocumentPath, DocumentStore, InMemoryDocumentStore, StoreError, StoreErrorCode};
pub use errors::{ErrorClass, classify, log_and_continue};
pub use offline::{ConnectivityState, OfflineError, OfflineMode};
pub use repository::{RecordRepository, RepositoryError};
