//! Hash functions used for addresses and local identifiers.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use ripemd::Ripemd160;
use sha3::{Digest, Sha3_256};

type Blake2b256 = Blake2b<U32>;

/// SHA3-256 of arbitrary data.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha3_256::digest(data));
    output
}

/// RIPEMD-160 of arbitrary data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut output = [0u8; 20];
    output.copy_from_slice(&Ripemd160::digest(data));
    output
}

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Blake2b256::digest(data));
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_known_vector() {
        // SHA3-256("")
        assert_eq!(
            sha3_256(b"")[..4],
            [0xa7, 0xff, 0xc6, 0xf8]
        );
    }

    #[test]
    fn ripemd_known_vector() {
        // RIPEMD-160("")
        assert_eq!(ripemd160(b"")[..4], [0x9c, 0x11, 0x85, 0xa5]);
    }

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"node"), blake2b_256(b"node"));
        assert_ne!(blake2b_256(b"node-a"), blake2b_256(b"node-b"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }
}
