//! Storage backend abstraction for potato.
//!
//! This crate defines the [`StorageBackend`] trait: a flat key-value
//! interface mapping paste identifiers to opaque byte content. It knows
//! nothing about how identifiers are generated or validated for display;
//! that lives in `potato-core`.
//!
//! Three implementations are provided:
//!
//! - [`FileBackend`]: production default, one file per key in a flat directory
//! - [`RocksDbBackend`]: backed by `RocksDB` (feature `rocksdb-backend`)
//! - [`MemoryBackend`]: in-memory, for tests and throwaway instances

mod error;
mod file;
mod memory;
#[cfg(feature = "rocksdb-backend")]
mod rocksdb_backend;

pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_backend::RocksDbBackend;

/// A pluggable key-value storage backend.
///
/// Keys are short ASCII identifiers with no separators. Values are opaque
/// byte arrays, stored and returned exactly as written.
///
/// There is no delete or list operation: pastes are immutable and the
/// service never enumerates them.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails, or
    /// [`StorageError::InvalidKey`] if the backend refuses the key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a key-value pair, overwriting any existing value.
    ///
    /// Overwrite detection is the caller's job (see the allocator in
    /// `potato-core`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Check whether a key exists in storage.
    ///
    /// A missing key is `Ok(false)`, never an error. The default
    /// implementation calls [`get`](StorageBackend::get); backends may
    /// override this with a cheaper check.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Returns `true` if `key` is safe to hand to a backend that maps keys
/// directly onto names (file names, for instance).
///
/// Only non-empty ASCII alphanumeric keys qualify.
pub(crate) fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric())
}
