//! Testing utilities
//!
//! In-memory stand-ins for the content source and the inference backend, for tests
//! of anything built on top of them.

mod mock;

pub use mock::{MockBackend, MockSource};
