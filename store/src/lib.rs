//! Opaque key-value persistence.
//!
//! The cosigner treats storage as a blob store with a handful of stable keys.
//! Every backend (JSON file, in-memory for testing) implements [`KvStore`];
//! the rest of the codebase depends only on the trait.

pub mod error;
pub mod file;
pub mod kv;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use kv::KvStore;

/// Key under which the address list is persisted.
pub const ADDRESSES_KEY: &str = "cosigner.addresses";
/// Key under which the node list is persisted.
pub const NODES_KEY: &str = "cosigner.nodes";
/// Key under which the currently selected network type is persisted.
pub const NETWORK_KEY: &str = "cosigner.network";
