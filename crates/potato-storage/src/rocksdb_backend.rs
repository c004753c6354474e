//! `RocksDB` storage backend.
//!
//! An alternative to the flat directory for deployments that prefer a single
//! embedded database over many small files. All operations are dispatched to
//! a blocking thread via [`tokio::task::spawn_blocking`] since `RocksDB` is a
//! synchronous C++ library.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

use crate::{StorageBackend, StorageError};

type Db = DBWithThreadMode<MultiThreaded>;

/// A storage backend backed by `RocksDB`.
///
/// Thread-safe (`Arc<DB>` internally) and safe to share across async tasks.
#[derive(Clone)]
pub struct RocksDbBackend {
    db: Arc<Db>,
    path: PathBuf,
}

impl std::fmt::Debug for RocksDbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RocksDbBackend {
    /// Open a `RocksDB` database at the given path.
    ///
    /// Creates the database directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if `RocksDB` fails to open or create the
    /// database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = Db::open(&opts, path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Return the filesystem path of this database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against the database on the blocking pool.
    async fn blocking<T, F>(
        &self,
        key: &str,
        on_err: fn(String, String) -> StorageError,
        op: F,
    ) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Db, &[u8]) -> Result<T, rocksdb::Error> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        let joined =
            tokio::task::spawn_blocking(move || op(&db, owned.as_bytes()).map_err(|e| e.to_string()))
                .await;

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(on_err(key.to_owned(), reason)),
            Err(e) => Err(on_err(key.to_owned(), format!("blocking task panicked: {e}"))),
        }
    }
}

fn read_err(key: String, reason: String) -> StorageError {
    StorageError::Read { key, reason }
}

fn write_err(key: String, reason: String) -> StorageError {
    StorageError::Write { key, reason }
}

#[async_trait::async_trait]
impl StorageBackend for RocksDbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.blocking(key, read_err, |db, k| db.get(k)).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let value = value.to_vec();
        self.blocking(key, write_err, move |db, k| db.put(k, &value))
            .await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.blocking(key, read_err, |db, k| {
            db.get_pinned(k).map(|v| v.is_some())
        })
        .await
    }
}
