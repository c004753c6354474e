//! Paste creation and retrieval.
//!
//! [`PasteService`] is what the HTTP layer talks to. Writes go through the
//! allocator and then the backend; reads go through the identifier gate and
//! then the backend.
//!
//! # Concurrency
//!
//! Allocation probes with `exists` and then writes with `put`; the two are
//! not atomic at the storage layer. Within one process the service holds a
//! write lock across both steps, so two concurrent submissions can never be
//! handed the same identifier. Reads take no lock.

use std::sync::Arc;

use potato_storage::StorageBackend;
use tokio::sync::Mutex;
use tracing::info;

use crate::allocator::Allocator;
use crate::error::PasteError;
use crate::identifier::Identifier;

/// Stores and serves pastes on top of a [`StorageBackend`].
pub struct PasteService {
    storage: Arc<dyn StorageBackend>,
    allocator: Allocator,
    write_lock: Mutex<()>,
}

impl PasteService {
    /// Create a service over `storage` using a random generator.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            allocator: Allocator::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the allocator.
    #[must_use]
    pub fn with_allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Store `content` under a fresh identifier.
    ///
    /// Content that is empty or whitespace-only is not stored and yields
    /// `Ok(None)`. Otherwise the content is stored exactly as given,
    /// surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// - [`PasteError::Exhausted`] if no free identifier was found; nothing
    ///   is written in that case.
    /// - [`PasteError::Storage`] if the probe or the write fails.
    pub async fn create(&self, content: &str) -> Result<Option<Identifier>, PasteError> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let _guard = self.write_lock.lock().await;
        let id = self.allocator.allocate(self.storage.as_ref()).await?;
        self.storage.put(id.as_str(), content.as_bytes()).await?;

        info!(id = %id, bytes = content.len(), "paste stored");
        Ok(Some(id))
    }

    /// Fetch the paste named by an untrusted `token`.
    ///
    /// The token is validated before storage is consulted; a malformed token
    /// and an unknown one both come back as [`PasteError::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`PasteError::NotFound`] as described above.
    /// - [`PasteError::Storage`] if the backend fails to read.
    pub async fn fetch(&self, token: &str) -> Result<Vec<u8>, PasteError> {
        let Some(id) = Identifier::parse(token) else {
            return Err(PasteError::NotFound);
        };
        self.storage
            .get(id.as_str())
            .await?
            .ok_or(PasteError::NotFound)
    }
}

impl std::fmt::Debug for PasteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteService")
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use potato_storage::{MemoryBackend, StorageError};

    use super::*;
    use crate::generator::SequenceGenerator;
    use crate::identifier::{ID_LENGTH, is_valid_identifier};

    /// Memory backend that counts every call reaching it.
    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl StorageBackend for CountingBackend {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, value).await
        }

        async fn exists(&self, key: &str) -> Result<bool, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.exists(key).await
        }
    }

    /// Backend whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyBackend;

    #[async_trait::async_trait]
    impl StorageBackend for ReadOnlyBackend {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        async fn put(&self, key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_owned(),
                reason: "read-only file system".to_owned(),
            })
        }
    }

    fn service() -> (Arc<MemoryBackend>, PasteService) {
        let storage = Arc::new(MemoryBackend::new());
        let service = PasteService::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
        (storage, service)
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let (_storage, service) = service();
        let id = service.create("hello world").await.unwrap().unwrap();

        assert_eq!(id.as_str().len(), ID_LENGTH);
        assert!(is_valid_identifier(id.as_str()));
        assert_eq!(service.fetch(id.as_str()).await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn content_is_stored_untrimmed() {
        let (_storage, service) = service();
        let content = "  indented\n\ttext \n";
        let id = service.create(content).await.unwrap().unwrap();
        assert_eq!(service.fetch(id.as_str()).await.unwrap(), content.as_bytes());
    }

    #[tokio::test]
    async fn fetch_is_idempotent() {
        let (_storage, service) = service();
        let id = service.create("same every time").await.unwrap().unwrap();
        for _ in 0..3 {
            assert_eq!(
                service.fetch(id.as_str()).await.unwrap(),
                b"same every time"
            );
        }
    }

    #[tokio::test]
    async fn blank_content_creates_nothing() {
        let (storage, service) = service();
        for blank in ["", "   ", "\n\t \r\n"] {
            assert!(service.create(blank).await.unwrap().is_none());
        }
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let (_storage, service) = service();
        assert!(matches!(
            service.fetch("zzzz").await,
            Err(PasteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn invalid_tokens_never_touch_storage() {
        let storage = Arc::new(CountingBackend::default());
        let service = PasteService::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);

        for token in ["../etc/passwd", "..", "a b", "", "a/b", "ab.c", "%2e%2e"] {
            assert!(matches!(
                service.fetch(token).await,
                Err(PasteError::NotFound)
            ));
        }
        assert_eq!(storage.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhaustion_writes_nothing() {
        let (storage, service) = service();
        storage.put("aaaa", b"first paste").await.unwrap();

        let generator =
            SequenceGenerator::new(vec![Identifier::parse("aaaa").unwrap()]).unwrap();
        let service = service.with_allocator(Allocator::new(generator));

        let err = service.create("second paste").await.unwrap_err();
        assert!(matches!(err, PasteError::Exhausted { attempts: 5 }));
        assert_eq!(service.fetch("aaaa").await.unwrap(), b"first paste");
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn write_failure_is_surfaced() {
        let service = PasteService::new(Arc::new(ReadOnlyBackend));
        let err = service.create("content").await.unwrap_err();
        assert!(matches!(err, PasteError::Storage(StorageError::Write { .. })));
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let (storage, service) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.create(&format!("paste {i}")).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert_eq!(storage.len().await, 50);
    }
}
