//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the cosigner (clock, HTTP, storage) sits
//! behind a trait. This crate provides test implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;
pub mod transport;

pub use clock::NullClock;
pub use store::NullStore;
pub use transport::{Method, NullTransport, RecordedCall};
