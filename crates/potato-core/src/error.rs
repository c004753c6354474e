//! Error types for `potato-core`.

use potato_storage::StorageError;

/// Errors from identifier allocation.
#[derive(Debug, thiserror::Error)]
pub enum AllocateError {
    /// Every attempt drew an identifier that is already taken.
    #[error("no free identifier found after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The existence probe failed.
    #[error("allocation storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from paste creation and retrieval.
#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    /// No paste under that identifier, or the identifier is malformed.
    ///
    /// The two cases are not distinguished.
    #[error("not found")]
    NotFound,

    /// The allocator ran out of attempts.
    #[error("no free identifier found after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The storage backend failed.
    #[error("paste storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<AllocateError> for PasteError {
    fn from(err: AllocateError) -> Self {
        match err {
            AllocateError::Exhausted { attempts } => Self::Exhausted { attempts },
            AllocateError::Storage(inner) => Self::Storage(inner),
        }
    }
}
