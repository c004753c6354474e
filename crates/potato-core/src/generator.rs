//! Identifier generators.
//!
//! Generators are pure: they produce candidates and never look at storage.
//! Collision handling belongs to the [`Allocator`](crate::Allocator).

#[cfg(any(test, feature = "test-util"))]
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::identifier::{ALPHABET, ID_LENGTH, Identifier};

/// Source of candidate identifiers.
pub trait IdGenerator: Send + Sync + 'static {
    /// Produce the next candidate.
    fn generate(&self) -> Identifier;
}

/// Draws [`ID_LENGTH`] characters independently and uniformly from
/// [`ALPHABET`] using the thread-local RNG.
///
/// Not cryptographically meaningful: identifiers are public retrieval keys,
/// so the goal is spread, not secrecy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl IdGenerator for RandomGenerator {
    fn generate(&self) -> Identifier {
        let alphabet = ALPHABET.as_bytes();
        let mut rng = rand::thread_rng();
        let id: String = (0..ID_LENGTH)
            .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
            .collect();
        Identifier::from_alphabet(id)
    }
}

/// Replays a fixed list of identifiers in order, wrapping around at the end.
///
/// Test helper: a deterministic stand-in for [`RandomGenerator`] when a test
/// needs to force collisions. Not for production use; only compiled for this
/// crate's own tests or with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct SequenceGenerator {
    ids: Vec<Identifier>,
    next: AtomicUsize,
}

#[cfg(any(test, feature = "test-util"))]
impl SequenceGenerator {
    /// Build a generator over `ids`. Returns `None` if `ids` is empty.
    #[must_use]
    pub fn new(ids: Vec<Identifier>) -> Option<Self> {
        if ids.is_empty() {
            return None;
        }
        Some(Self {
            ids,
            next: AtomicUsize::new(0),
        })
    }

    /// How many identifiers have been handed out so far.
    pub fn calls(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl IdGenerator for SequenceGenerator {
    fn generate(&self) -> Identifier {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        self.ids[n % self.ids.len()].clone()
    }
}
