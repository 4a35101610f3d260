use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one cached response.
///
/// Mirrors the gateway response so cache backends stay free of HTTP types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryRecord {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Repository contract for small string blobs stored under fixed keys.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Repository contract for named cache generations of request/response pairs.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the named cache if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cache cannot be created.
    async fn open_cache(&self, cache_name: &str) -> Result<(), StorageError>;

    /// List every stored cache generation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn cache_names(&self) -> Result<Vec<String>, StorageError>;

    /// Delete a cache generation and all of its entries.
    ///
    /// Returns `false` when no such cache existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_cache(&self, cache_name: &str) -> Result<bool, StorageError>;

    /// Look up the entry stored for `request_key` in `cache_name`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn match_entry(
        &self,
        cache_name: &str,
        request_key: &str,
    ) -> Result<Option<CacheEntryRecord>, StorageError>;

    /// Store `entry` for `request_key`, replacing any earlier entry.
    ///
    /// Creates the cache when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put_entry(
        &self,
        cache_name: &str,
        request_key: &str,
        entry: &CacheEntryRecord,
    ) -> Result<(), StorageError>;

    /// Request keys stored in `cache_name`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown cache, or other storage errors.
    async fn keys(&self, cache_name: &str) -> Result<Vec<String>, StorageError>;
}

type CacheMap = BTreeMap<String, HashMap<String, CacheEntryRecord>>;

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
    caches: Arc<Mutex<CacheMap>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.values.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.values.lock().map_err(poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[async_trait]
impl CacheStore for InMemoryRepository {
    async fn open_cache(&self, cache_name: &str) -> Result<(), StorageError> {
        let mut guard = self.caches.lock().map_err(poisoned)?;
        guard.entry(cache_name.to_owned()).or_default();
        Ok(())
    }

    async fn cache_names(&self) -> Result<Vec<String>, StorageError> {
        let guard = self.caches.lock().map_err(poisoned)?;
        Ok(guard.keys().cloned().collect())
    }

    async fn delete_cache(&self, cache_name: &str) -> Result<bool, StorageError> {
        let mut guard = self.caches.lock().map_err(poisoned)?;
        Ok(guard.remove(cache_name).is_some())
    }

    async fn match_entry(
        &self,
        cache_name: &str,
        request_key: &str,
    ) -> Result<Option<CacheEntryRecord>, StorageError> {
        let guard = self.caches.lock().map_err(poisoned)?;
        Ok(guard
            .get(cache_name)
            .and_then(|entries| entries.get(request_key))
            .cloned())
    }

    async fn put_entry(
        &self,
        cache_name: &str,
        request_key: &str,
        entry: &CacheEntryRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.caches.lock().map_err(poisoned)?;
        guard
            .entry(cache_name.to_owned())
            .or_default()
            .insert(request_key.to_owned(), entry.clone());
        Ok(())
    }

    async fn keys(&self, cache_name: &str) -> Result<Vec<String>, StorageError> {
        let guard = self.caches.lock().map_err(poisoned)?;
        let entries = guard.get(cache_name).ok_or(StorageError::NotFound)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub values: Arc<dyn KeyValueRepository>,
    pub caches: Arc<dyn CacheStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let values: Arc<dyn KeyValueRepository> = Arc::new(repo.clone());
        let caches: Arc<dyn CacheStore> = Arc::new(repo);
        Self { values, caches }
    }
}
