//! Filesystem storage backend, the production default.
//!
//! Each key is one file directly inside the data directory, named exactly
//! after the key, with the value as its raw contents. There is no
//! extension, header, or envelope.
//!
//! Because keys become path components, every operation refuses keys that
//! are not plain ASCII alphanumerics before a path is ever built.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{StorageBackend, StorageError, is_safe_key};

/// A storage backend that keeps one file per key in a flat directory.
///
/// # Examples
///
/// ```no_run
/// # use potato_storage::FileBackend;
/// let backend = FileBackend::open("./data").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open a file backend rooted at `root`.
    ///
    /// Creates the directory (and any missing parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created or
    /// the path exists but is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        let open_err = |reason: String| StorageError::Open {
            path: root.display().to_string(),
            reason,
        };

        std::fs::create_dir_all(root).map_err(|e| open_err(e.to_string()))?;
        if !root.is_dir() {
            return Err(open_err("not a directory".to_owned()));
        }

        tracing::debug!(path = %root.display(), "file storage ready");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Return the data directory of this backend.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_key(key) {
            return Err(StorageError::InvalidKey {
                key: key.to_owned(),
            });
        }
        Ok(self.root.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }
}
