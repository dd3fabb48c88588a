//! Testing utilities.
//!
//! Provides an in-memory HTTP backend for testing applications built on
//! this client without touching the network.

mod mock;

pub use mock::{link_header, MockBackend, MockResponse};
