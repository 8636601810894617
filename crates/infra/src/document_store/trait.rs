use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Address of one document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentPath {
    pub collection: String,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl core::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A stored document (JSON body + last write time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: DocumentPath,
    pub data: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Error codes reported by the hosted document service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreErrorCode {
    PermissionDenied,
    NotFound,
    Unavailable,
    Internal,
    InvalidArgument,
    Unauthenticated,
    Unknown,
}

impl StoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorCode::PermissionDenied => "permission-denied",
            StoreErrorCode::NotFound => "not-found",
            StoreErrorCode::Unavailable => "unavailable",
            StoreErrorCode::Internal => "internal",
            StoreErrorCode::InvalidArgument => "invalid-argument",
            StoreErrorCode::Unauthenticated => "unauthenticated",
            StoreErrorCode::Unknown => "unknown",
        }
    }
}

impl core::fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for StoreErrorCode {
    type Err = core::convert::Infallible;

    /// Unrecognized codes map to `Unknown`; the service adds codes over time.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().trim_start_matches("firestore/");
        Ok(match code {
            "permission-denied" => StoreErrorCode::PermissionDenied,
            "not-found" => StoreErrorCode::NotFound,
            "unavailable" => StoreErrorCode::Unavailable,
            "internal" => StoreErrorCode::Internal,
            "invalid-argument" => StoreErrorCode::InvalidArgument,
            "unauthenticated" => StoreErrorCode::Unauthenticated,
            _ => StoreErrorCode::Unknown,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::PermissionDenied, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Internal, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidArgument, message)
    }
}

/// Per-document reads/writes against the hosted database.
///
/// Every call is awaited on its own: no batching, no retry.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document; `Ok(None)` when it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Create or overwrite one document.
    async fn set(&self, path: &DocumentPath, data: JsonValue) -> Result<(), StoreError>;

    /// Delete one document. Deleting a missing document is not an error.
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError>;

    /// All documents in a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Toggle network access. While disabled, the offline cache (if enabled)
    /// serves reads and queues writes; re-enabling flushes queued writes.
    async fn set_network_enabled(&self, enabled: bool) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        (**self).get(path).await
    }

    async fn set(&self, path: &DocumentPath, data: JsonValue) -> Result<(), StoreError> {
        (**self).set(path, data).await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        (**self).delete(path).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).list(collection).await
    }

    async fn set_network_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        (**self).set_network_enabled(enabled).await
    }
}
