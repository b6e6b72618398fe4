//! Cryptographic primitives for the cosigner.
//!
//! - **Ed25519** for key derivation, cosigning and verification
//! - **SHA3-256 + RIPEMD-160** for address derivation and checksums
//! - **Blake2b** for deterministic local identifiers
//! - Address encoding in RFC 4648 base32 (39 characters, no padding)

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, verify_address_checksum};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, ripemd160, sha3_256};
pub use keys::derive_public_key;
pub use sign::{sign_cosignature, verify_cosignature, COSIGNATURE_VERSION};
