use async_trait::async_trait;
use quiz_core::model::ProgressMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the whole progress mapping is stored.
pub const PROGRESS_KEY: &str = "quiz-progress-v1";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── KEY-VALUE STORE ──────────────────────────────────────────────────────────
//

/// Minimal string key-value persistence contract.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

//
// ─── PROGRESS REPOSITORY ──────────────────────────────────────────────────────
//

/// Loads and saves the complete progress mapping as one unit.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored mapping, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed data, or other storage errors.
    async fn load(&self) -> Result<Option<ProgressMap>, StorageError>;

    /// Replace the stored mapping with `progress`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be serialized or written.
    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError>;
}

/// Stores the progress mapping as JSON under [`PROGRESS_KEY`].
#[derive(Clone)]
pub struct KvProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvProgressRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProgressRepository for KvProgressRepository {
    async fn load(&self) -> Result<Option<ProgressMap>, StorageError> {
        let Some(raw) = self.store.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(progress)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(PROGRESS_KEY, &raw).await?;
        tracing::debug!(bytes = raw.len(), "progress saved");
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    #[must_use]
    pub fn from_store(kv: Arc<dyn KeyValueStore>) -> Self {
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(KvProgressRepository::new(Arc::clone(&kv)));
        Self { kv, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{SubjectId, TestId};

    #[tokio::test]
    async fn in_memory_store_round_trips_values() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn progress_repository_saves_under_fixed_key() {
        let storage = Storage::in_memory();
        let mut map = ProgressMap::new();
        map.record(&SubjectId::new("android"), TestId::new(1), 12, 30);

        storage.progress.save(&map).await.unwrap();
        let raw = storage.kv.get(PROGRESS_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"bestScore\":12"));

        let loaded = storage.progress.load().await.unwrap().unwrap();
        assert_eq!(loaded, map);
    }

    #[tokio::test]
    async fn missing_progress_loads_as_none() {
        let storage = Storage::in_memory();
        assert!(storage.progress.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_progress_is_a_serialization_error() {
        let storage = Storage::in_memory();
        storage.kv.set(PROGRESS_KEY, "{not json").await.unwrap();
        let err = storage.progress.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
