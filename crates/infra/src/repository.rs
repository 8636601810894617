//! Record persistence over a [`DocumentStore`].
//!
//! Each record type lives in the collection named by its `KIND`, one JSON
//! document per record, keyed by record id.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use opsdesk_core::{Entity, Record, RecordId};

use crate::document_store::{DocumentPath, DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed document {path}: {source}")]
    Malformed {
        path: DocumentPath,
        #[source]
        source: serde_json::Error,
    },
}

impl RepositoryError {
    /// The underlying store error, when there is one.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            RepositoryError::Store(err) => Some(err),
            RepositoryError::Malformed { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct RecordRepository<S, T> {
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> RecordRepository<S, T>
where
    S: DocumentStore,
    T: Record + Serialize + DeserializeOwned,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn path(id: &RecordId) -> DocumentPath {
        DocumentPath::new(T::KIND, id.to_string())
    }

    fn decode(path: DocumentPath, data: serde_json::Value) -> Result<T, RepositoryError> {
        serde_json::from_value(data).map_err(|source| RepositoryError::Malformed { path, source })
    }

    pub async fn save(&self, record: &T) -> Result<(), RepositoryError> {
        let path = Self::path(record.id());
        let data = serde_json::to_value(record).map_err(|source| RepositoryError::Malformed {
            path: path.clone(),
            source,
        })?;
        self.store.set(&path, data).await?;
        tracing::debug!(%path, "record saved");
        Ok(())
    }

    pub async fn load(&self, id: &RecordId) -> Result<Option<T>, RepositoryError> {
        let path = Self::path(id);
        match self.store.get(&path).await? {
            Some(doc) => Self::decode(doc.path, doc.data).map(Some),
            None => Ok(None),
        }
    }

    pub async fn remove(&self, id: &RecordId) -> Result<(), RepositoryError> {
        self.store.delete(&Self::path(id)).await?;
        Ok(())
    }

    /// Every record in the collection. One malformed document fails the load.
    pub async fn load_all(&self) -> Result<Vec<T>, RepositoryError> {
        self.store
            .list(T::KIND)
            .await?
            .into_iter()
            .map(|doc| Self::decode(doc.path, doc.data))
            .collect()
    }

    /// Save many records one call at a time, stopping at the first failure.
    pub async fn save_all<'a, I>(&self, records: I) -> Result<usize, RepositoryError>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut saved = 0;
        for record in records {
            self.save(record).await?;
            saved += 1;
        }
        Ok(saved)
    }
}
