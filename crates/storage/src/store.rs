use {async_trait::async_trait, serde::Serialize, serde_json::Value};

use crate::error::Result;

/// Backend kind and operational status, as surfaced by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageHealth {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl StorageHealth {
    pub const OK: &'static str = "ok";
    pub const UNINITIALIZED: &'static str = "uninitialized";

    pub fn new(kind: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status: status.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Key/value storage partitioned into named collections.
///
/// Every registry operation goes through this trait. Values are JSON documents;
/// callers own the mapping to and from their typed records.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Acquire backing resources. Calling it again on a ready backend is a no-op.
    async fn init_db(&self) -> Result<()>;

    /// Release backing resources. Data operations fail until the next `init_db`.
    async fn shutdown(&self) -> Result<()>;

    /// Insert or overwrite the record stored under `key`.
    async fn put(&self, collection: &str, key: &str, value: Value) -> Result<()>;

    /// Insert the record only if `key` is free. Returns `false` and leaves the
    /// existing record untouched otherwise. The check and the insert are atomic.
    async fn put_if_absent(&self, collection: &str, key: &str, value: Value) -> Result<bool>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    async fn exists(&self, collection: &str, key: &str) -> Result<bool>;

    /// Remove the record under `key`. Returns whether anything was removed.
    async fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    /// All records of a collection. Unknown collections are empty.
    async fn list_all(&self, collection: &str) -> Result<Vec<Value>>;

    /// Never fails; an unusable backend reports it through the status field.
    async fn health(&self) -> StorageHealth;
}
