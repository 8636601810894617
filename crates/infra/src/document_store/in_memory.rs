use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{RwLock, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::offline::{OfflineError, OfflineMode};

use super::r#trait::{Document, DocumentPath, DocumentStore, StoreError};

#[derive(Debug, Clone)]
enum PendingWrite {
    Set(Document),
    Delete(DocumentPath),
}

#[derive(Debug, Default)]
struct State {
    /// What the hosted service holds.
    remote: HashMap<DocumentPath, Document>,
    /// Local cache; `None` marks a delete not yet acknowledged by the service.
    cache: HashMap<DocumentPath, Option<Document>>,
    pending: Vec<PendingWrite>,
    offline: OfflineMode,
    denied: HashSet<String>,
    injected: VecDeque<StoreError>,
}

impl State {
    fn check(&mut self, collection: &str) -> Result<(), StoreError> {
        if let Some(err) = self.injected.pop_front() {
            return Err(err);
        }
        if self.denied.contains(collection) {
            return Err(StoreError::permission_denied("Missing or insufficient permissions."));
        }
        self.offline.require_reachable().map_err(offline_error)
    }

    fn cache_enabled(&self) -> bool {
        self.offline.cache_enabled()
    }
}

fn offline_error(err: OfflineError) -> StoreError {
    StoreError::unavailable(err.to_string())
}

/// In-memory document database with the hosted client's offline cache semantics.
///
/// Intended for tests/dev. While the network is disabled, reads come from
/// the cache and writes queue up until the network is re-enabled.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose offline cache is on or off.
    pub fn with_offline_cache(enabled: bool) -> Self {
        Self {
            state: RwLock::new(State {
                offline: OfflineMode::new(enabled),
                ..State::default()
            }),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::internal("lock poisoned"))
    }

    /// Reject every call against `collection` with `permission-denied`,
    /// the way security rules do for a signed-out or under-privileged user.
    pub fn deny_collection(&self, collection: impl Into<String>) -> Result<(), StoreError> {
        self.write()?.denied.insert(collection.into());
        Ok(())
    }

    pub fn allow_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.write()?.denied.remove(collection);
        Ok(())
    }

    /// Fail the next call with `err`, whatever it is.
    pub fn fail_next(&self, err: StoreError) -> Result<(), StoreError> {
        self.write()?.injected.push_back(err);
        Ok(())
    }

    /// Writes made offline and not yet delivered.
    pub fn pending_writes(&self) -> usize {
        self.state.read().map(|s| s.pending.len()).unwrap_or(0)
    }

    pub fn is_offline(&self) -> bool {
        self.state.read().map(|s| s.offline.is_offline()).unwrap_or(false)
    }

    fn flush(state: &mut State) {
        let pending = std::mem::take(&mut state.pending);
        let count = pending.len();
        for write in pending {
            let path = match &write {
                PendingWrite::Set(doc) => &doc.path,
                PendingWrite::Delete(path) => path,
            };
            if state.denied.contains(&path.collection) {
                tracing::warn!(path = %path, "queued write rejected on flush: permission denied");
                // The service refused it; drop the optimistic cache entry too.
                state.cache.remove(path);
                continue;
            }
            match write {
                PendingWrite::Set(doc) => {
                    state.cache.insert(doc.path.clone(), Some(doc.clone()));
                    state.remote.insert(doc.path.clone(), doc);
                }
                PendingWrite::Delete(path) => {
                    state.remote.remove(&path);
                    state.cache.remove(&path);
                }
            }
        }
        if count > 0 {
            tracing::info!(count, "flushed queued document writes");
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let mut state = self.write()?;
        state.check(&path.collection)?;

        if state.offline.is_offline() {
            return match state.cache.get(path) {
                Some(cached) => Ok(cached.clone()),
                None => Err(StoreError::unavailable(
                    "Failed to get document because the client is offline.",
                )),
            };
        }

        let doc = state.remote.get(path).cloned();
        if state.cache_enabled() {
            match &doc {
                Some(doc) => {
                    state.cache.insert(path.clone(), Some(doc.clone()));
                }
                None => {
                    state.cache.remove(path);
                }
            }
        }
        Ok(doc)
    }

    async fn set(&self, path: &DocumentPath, data: JsonValue) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.check(&path.collection)?;

        let doc = Document {
            path: path.clone(),
            data,
            updated_at: Utc::now(),
        };

        if state.offline.is_offline() {
            state.cache.insert(path.clone(), Some(doc.clone()));
            state.pending.push(PendingWrite::Set(doc));
            return Ok(());
        }

        if state.cache_enabled() {
            state.cache.insert(path.clone(), Some(doc.clone()));
        }
        state.remote.insert(path.clone(), doc);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.check(&path.collection)?;

        if state.offline.is_offline() {
            state.cache.insert(path.clone(), None);
            state.pending.push(PendingWrite::Delete(path.clone()));
            return Ok(());
        }

        state.cache.remove(path);
        state.remote.remove(path);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut state = self.write()?;
        state.check(collection)?;

        let mut docs: Vec<Document> = if state.offline.is_offline() {
            state
                .cache
                .iter()
                .filter(|(path, _)| path.collection == collection)
                .filter_map(|(_, doc)| doc.clone())
                .collect()
        } else {
            let docs: Vec<Document> = state
                .remote
                .values()
                .filter(|doc| doc.path.collection == collection)
                .cloned()
                .collect();
            if state.cache_enabled() {
                for doc in &docs {
                    state.cache.insert(doc.path.clone(), Some(doc.clone()));
                }
            }
            docs
        };

        docs.sort_by(|a, b| a.path.id.cmp(&b.path.id));
        Ok(docs)
    }

    async fn set_network_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if enabled {
            state.offline.set_online();
            Self::flush(&mut state);
        } else {
            state.offline.set_offline();
        }
        tracing::debug!(enabled, "document store network toggled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::StoreErrorCode;
    use serde_json::json;

    fn path(id: &str) -> DocumentPath {
        DocumentPath::new("assets", id)
    }

    #[tokio::test]
    async fn set_get_list_delete_online() {
        let store = InMemoryDocumentStore::new();

        store.set(&path("b"), json!({"tag": "B"})).await.unwrap();
        store.set(&path("a"), json!({"tag": "A"})).await.unwrap();
        store.set(&DocumentPath::new("licenses", "x"), json!({})).await.unwrap();

        let doc = store.get(&path("a")).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"tag": "A"}));

        let ids: Vec<_> = store
            .list("assets")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.path.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);

        store.delete(&path("a")).await.unwrap();
        store.delete(&path("missing")).await.unwrap();
        assert!(store.get(&path("a")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn offline_writes_queue_and_flush_on_reconnect() {
        let store = InMemoryDocumentStore::new();
        store.set(&path("a"), json!({"v": 1})).await.unwrap();
        store.get(&path("a")).await.unwrap();

        store.set_network_enabled(false).await.unwrap();
        store.set(&path("a"), json!({"v": 2})).await.unwrap();
        store.set(&path("b"), json!({"v": 1})).await.unwrap();
        store.delete(&path("b")).await.unwrap();

        assert_eq!(store.pending_writes(), 3);
        // Reads see local writes.
        assert_eq!(store.get(&path("a")).await.unwrap().unwrap().data, json!({"v": 2}));
        assert!(store.get(&path("b")).await.unwrap().is_none());
        assert_eq!(store.list("assets").await.unwrap().len(), 1);

        store.set_network_enabled(true).await.unwrap();
        assert_eq!(store.pending_writes(), 0);
        assert_eq!(store.get(&path("a")).await.unwrap().unwrap().data, json!({"v": 2}));
        assert!(store.get(&path("b")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn offline_read_of_uncached_document_is_unavailable() {
        let store = InMemoryDocumentStore::new();
        store.set_network_enabled(false).await.unwrap();

        let err = store.get(&path("never-seen")).await.unwrap_err();
        assert_eq!(err.code, StoreErrorCode::Unavailable);
    }

    #[tokio::test]
    async fn offline_without_cache_fails_every_call() {
        let store = InMemoryDocumentStore::with_offline_cache(false);
        store.set(&path("a"), json!({})).await.unwrap();
        store.set_network_enabled(false).await.unwrap();

        assert_eq!(store.get(&path("a")).await.unwrap_err().code, StoreErrorCode::Unavailable);
        assert_eq!(
            store.set(&path("a"), json!({})).await.unwrap_err().code,
            StoreErrorCode::Unavailable
        );
        assert_eq!(store.pending_writes(), 0);
    }

    #[tokio::test]
    async fn denied_collection_reports_permission_denied() {
        let store = InMemoryDocumentStore::new();
        store.deny_collection("users").unwrap();

        let err = store.list("users").await.unwrap_err();
        assert_eq!(err.code, StoreErrorCode::PermissionDenied);

        store.allow_collection("users").unwrap();
        assert!(store.list("users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queued_write_to_denied_collection_is_dropped_on_flush() {
        let store = InMemoryDocumentStore::new();
        store.set_network_enabled(false).await.unwrap();
        store.set(&path("a"), json!({})).await.unwrap();

        store.deny_collection("assets").unwrap();
        store.set_network_enabled(true).await.unwrap();
        store.allow_collection("assets").unwrap();

        assert!(store.get(&path("a")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = InMemoryDocumentStore::new();
        store.fail_next(StoreError::internal("boom")).unwrap();

        assert_eq!(store.list("assets").await.unwrap_err().code, StoreErrorCode::Internal);
        assert!(store.list("assets").await.is_ok());
    }
}
