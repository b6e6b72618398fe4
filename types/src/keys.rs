//! Cryptographic key and signature types.
//!
//! All byte values travel as uppercase hexadecimal on the wire and in storage.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("expected {expected} hex characters, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid hex digit")]
    InvalidDigit,
}

/// Decode exactly `N` bytes of hex into `out`, without intermediate buffers.
pub(crate) fn decode_fixed<const N: usize>(input: &str, out: &mut [u8; N]) -> Result<(), HexError> {
    let input = input.trim();
    if input.len() != N * 2 {
        return Err(HexError::Length {
            expected: N * 2,
            got: input.len(),
        });
    }
    hex::decode_to_slice(input, out).map_err(|_| HexError::InvalidDigit)
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn from_hex(input: &str) -> Result<Self, HexError> {
        let mut bytes = [0u8; 32];
        decode_fixed(input, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 32-byte Ed25519 private key (seed).
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    /// Parse a 64-character hex private key. The bytes are decoded straight
    /// into the zeroizing container.
    pub fn from_hex(input: &str) -> Result<Self, HexError> {
        let mut key = Self([0u8; 32]);
        decode_fixed(input, &mut key.0)?;
        Ok(key)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn from_hex(input: &str) -> Result<Self, HexError> {
        let mut bytes = [0u8; 64];
        decode_fixed(input, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                <$ty>::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use hex_serde;

hex_serde!(PublicKey);
hex_serde!(Signature);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_hex_round_trip() {
        let pk = PublicKey([0xAB; 32]);
        let hex = pk.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| !c.is_ascii_lowercase()));
        assert_eq!(PublicKey::from_hex(&hex).unwrap(), pk);
        assert_eq!(PublicKey::from_hex(&hex.to_lowercase()).unwrap(), pk);
    }

    #[test]
    fn private_key_rejects_wrong_length() {
        let err = PrivateKey::from_hex("abcd").err().unwrap();
        assert_eq!(err, HexError::Length { expected: 64, got: 4 });
    }

    #[test]
    fn private_key_rejects_non_hex() {
        let input = "zz".repeat(32);
        assert_eq!(PrivateKey::from_hex(&input).err(), Some(HexError::InvalidDigit));
    }

    #[test]
    fn private_key_parses_and_zeroizes() {
        let mut key = PrivateKey::from_hex(&"01".repeat(32)).unwrap();
        assert_eq!(key.0, [1u8; 32]);
        key.zeroize();
        assert_eq!(key.0, [0u8; 32]);
    }

    #[test]
    fn signature_serde_is_hex_string() {
        let sig = Signature([7u8; 64]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(64)));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }
}
