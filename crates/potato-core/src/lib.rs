//! Core library for potato.
//!
//! Contains the identifier policy (alphabet, validation gate), identifier
//! generation, the bounded-retry allocator, and the paste service that ties
//! them to a storage backend. This crate depends on `potato-storage` for the
//! backend trait and knows nothing about HTTP.

pub mod allocator;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod paste;

pub use allocator::Allocator;
pub use error::{AllocateError, PasteError};
#[cfg(any(test, feature = "test-util"))]
pub use generator::SequenceGenerator;
pub use generator::{IdGenerator, RandomGenerator};
pub use identifier::{ALPHABET, ID_LENGTH, Identifier, is_valid_identifier};
pub use paste::PasteService;
