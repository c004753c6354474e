//! Bounded-retry identifier allocation.
//!
//! The allocator draws a candidate from its [`IdGenerator`], probes the
//! storage backend, and returns the first candidate that is not taken. After
//! `max_attempts` collisions it gives up with
//! [`AllocateError::Exhausted`]. It never falls back to a colliding
//! identifier, so an existing paste is never overwritten by allocation.
//!
//! The probe and the later write are separate calls; see
//! [`PasteService`](crate::PasteService) for how they are serialized.

use potato_storage::StorageBackend;
use tracing::{debug, warn};

use crate::error::AllocateError;
use crate::generator::{IdGenerator, RandomGenerator};
use crate::identifier::Identifier;

/// Default number of candidates tried before giving up.
pub const MAX_ATTEMPTS: u32 = 5;

/// Produces identifiers that are free in a given storage backend.
pub struct Allocator {
    generator: Box<dyn IdGenerator>,
    max_attempts: u32,
}

impl Allocator {
    /// Create an allocator drawing from `generator` with [`MAX_ATTEMPTS`].
    pub fn new(generator: impl IdGenerator) -> Self {
        Self {
            generator: Box::new(generator),
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Override the attempt budget. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Find an identifier with no paste stored under it.
    ///
    /// # Errors
    ///
    /// - [`AllocateError::Exhausted`] if every attempt collided.
    /// - [`AllocateError::Storage`] if an existence probe fails; probes are
    ///   not retried.
    pub async fn allocate(
        &self,
        storage: &dyn StorageBackend,
    ) -> Result<Identifier, AllocateError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();
            if !storage.exists(candidate.as_str()).await? {
                return Ok(candidate);
            }
            debug!(id = %candidate, attempt, "identifier already taken");
        }

        warn!(attempts = self.max_attempts, "identifier allocation exhausted");
        Err(AllocateError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(RandomGenerator)
    }
}

impl std::fmt::Debug for Allocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
