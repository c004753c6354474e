//! potato HTTP server.
//!
//! Wires the paste service and a storage backend into an Axum router: an
//! authenticated submission form at `/` and public paste pages at `/{id}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;
