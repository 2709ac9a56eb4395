use std::collections::HashMap;

use {
    async_trait::async_trait,
    indexmap::IndexMap,
    serde_json::Value,
    tokio::sync::RwLock,
    tracing::{debug, info},
};

use crate::{
    error::{Error, Result},
    store::{Storage, StorageHealth},
};

const BACKEND: &str = "memory";

type Collections = HashMap<String, IndexMap<String, Value>>;

/// Volatile storage held in process memory.
///
/// Each collection keeps insertion order, so `list_all` returns records in the
/// order they were first stored. `None` means the backend has not been
/// initialized (or has been shut down).
#[derive(Default)]
pub struct MemoryStorage {
    collections: RwLock<Option<Collections>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `collection`, `0` when uninitialized.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .as_ref()
            .and_then(|c| c.get(collection))
            .map_or(0, IndexMap::len)
    }

    /// Number of collections that have received at least one write.
    pub async fn collection_count(&self) -> usize {
        self.collections.read().await.as_ref().map_or(0, HashMap::len)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init_db(&self) -> Result<()> {
        let mut guard = self.collections.write().await;
        if guard.is_none() {
            *guard = Some(HashMap::new());
            info!(backend = BACKEND, "storage initialized");
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if self.collections.write().await.take().is_some() {
            info!(backend = BACKEND, "storage shut down");
        }
        Ok(())
    }

    async fn put(&self, collection: &str, key: &str, value: Value) -> Result<()> {
        let mut guard = self.collections.write().await;
        let collections = guard.as_mut().ok_or(Error::not_initialized(BACKEND))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        debug!(collection, key, "put");
        Ok(())
    }

    async fn put_if_absent(&self, collection: &str, key: &str, value: Value) -> Result<bool> {
        let mut guard = self.collections.write().await;
        let collections = guard.as_mut().ok_or(Error::not_initialized(BACKEND))?;
        let records = collections.entry(collection.to_string()).or_default();
        if records.contains_key(key) {
            return Ok(false);
        }
        records.insert(key.to_string(), value);
        debug!(collection, key, "inserted");
        Ok(true)
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let guard = self.collections.read().await;
        let collections = guard.as_ref().ok_or(Error::not_initialized(BACKEND))?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    async fn exists(&self, collection: &str, key: &str) -> Result<bool> {
        let guard = self.collections.read().await;
        let collections = guard.as_ref().ok_or(Error::not_initialized(BACKEND))?;
        Ok(collections
            .get(collection)
            .is_some_and(|records| records.contains_key(key)))
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let mut guard = self.collections.write().await;
        let collections = guard.as_mut().ok_or(Error::not_initialized(BACKEND))?;
        // shift_remove keeps the remaining records in insertion order.
        let removed = collections
            .get_mut(collection)
            .and_then(|records| records.shift_remove(key))
            .is_some();
        if removed {
            debug!(collection, key, "deleted");
        }
        Ok(removed)
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Value>> {
        let guard = self.collections.read().await;
        let collections = guard.as_ref().ok_or(Error::not_initialized(BACKEND))?;
        Ok(collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn health(&self) -> StorageHealth {
        let status = if self.collections.read().await.is_some() {
            StorageHealth::OK
        } else {
            StorageHealth::UNINITIALIZED
        };
        StorageHealth::new(BACKEND, status)
    }
}
