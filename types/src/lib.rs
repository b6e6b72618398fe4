//! Fundamental types for the multisig cosigner.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, network types, keys, hashes, timestamps, node health enums,
//! the detached cosignature payload, and the error taxonomy.

pub mod address;
pub mod cosignature;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod node;
pub mod serde_util;
pub mod time;

pub use address::{Address, AddressError};
pub use cosignature::DetachedCosignature;
pub use error::ErrorKind;
pub use hash::TxHash;
pub use keys::{HexError, PrivateKey, PublicKey, Signature};
pub use network::NetworkType;
pub use node::{ConnectionQuality, NodeId, NodeStatus};
pub use time::{Deadline, Timestamp};
