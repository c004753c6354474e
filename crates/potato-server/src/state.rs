//! Shared application state for the potato server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It is never mutated afterwards.

use std::sync::Arc;

use potato_core::PasteService;
use potato_storage::StorageBackend;

use crate::config::{Credentials, Limits};

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Paste creation and retrieval.
    pub pastes: PasteService,
    /// Credentials for the submission form.
    pub credentials: Credentials,
    /// Request limits used when building the router.
    pub limits: Limits,
}

impl AppState {
    /// Build state over a storage backend with the default allocator.
    pub fn new(storage: Arc<dyn StorageBackend>, credentials: Credentials, limits: Limits) -> Self {
        Self {
            pastes: PasteService::new(storage),
            credentials,
            limits,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
