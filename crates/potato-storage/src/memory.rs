//! In-memory storage backend.
//!
//! Pastes live in a `BTreeMap` behind a `RwLock` and vanish when the process
//! exits. Two uses: `POTATO_STORAGE=memory` for a scratch instance that
//! needs no data directory, and router/service tests that want to inspect
//! what was (or was not) written without touching the filesystem.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{StorageBackend, StorageError};

/// Paste storage that never touches disk.
///
/// Clones share one map, so a test can hand a clone to the server and keep
/// the original to check what a request stored. Keys are not validated:
/// nothing here maps a key onto a path.
///
/// # Examples
///
/// ```
/// # use potato_storage::{MemoryBackend, StorageBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// let handed_to_server = backend.clone();
///
/// handed_to_server.put("aB3x", b"hello").await.unwrap();
///
/// assert_eq!(backend.len().await, 1);
/// assert!(backend.exists("aB3x").await.unwrap());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Number of stored pastes.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }
}
