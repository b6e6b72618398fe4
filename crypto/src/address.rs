//! Account address derivation from public keys.
//!
//! Raw address (24 bytes):
//! `network_byte ‖ RIPEMD160(SHA3-256(public_key)) ‖ checksum`
//! where checksum is the first 3 bytes of SHA3-256 over the preceding 21 bytes.
//!
//! The raw bytes are base32 encoded (RFC 4648 alphabet, right-padded with zero
//! bits, no `=`), giving 39 characters.

use cosign_types::address::{ADDRESS_LEN, BASE32_ALPHABET};
use cosign_types::{Address, NetworkType, PublicKey};

use crate::hash::{ripemd160, sha3_256};

/// Raw decoded address length.
const RAW_LEN: usize = 24;
/// Network byte plus key hash.
const BODY_LEN: usize = 21;
const CHECKSUM_LEN: usize = 3;

fn base32_value(c: u8) -> Option<u64> {
    BASE32_ALPHABET.iter().position(|&a| a == c).map(|v| v as u64)
}

/// Base32 without `=` padding. Input is consumed in 5-byte blocks; a short
/// final block is zero-filled and only the characters it covers are emitted.
fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    for chunk in bytes.chunks(5) {
        let mut block = [0u8; 5];
        block[..chunk.len()].copy_from_slice(chunk);
        let word = block.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        for i in 0..(chunk.len() * 8).div_ceil(5) {
            let index = (word >> (35 - 5 * i)) & 0x1F;
            out.push(BASE32_ALPHABET[index as usize] as char);
        }
    }
    out
}

/// Inverse of [`encode_base32`] into exactly `N` bytes. Trailing pad bits
/// are discarded; `None` on a foreign character or too little input.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    let mut written = 0;
    for chunk in s.as_bytes().chunks(8) {
        let mut word = 0u64;
        for i in 0..8 {
            let value = match chunk.get(i) {
                Some(&c) => base32_value(c)?,
                None => 0,
            };
            word = (word << 5) | value;
        }
        for i in 0..(chunk.len() * 5) / 8 {
            if written == N {
                break;
            }
            out[written] = (word >> (32 - 8 * i)) as u8;
            written += 1;
        }
    }
    (written == N).then_some(out)
}

/// Derive the address of `public_key` on `network`.
pub fn derive_address(public_key: &PublicKey, network: NetworkType) -> Address {
    let key_hash = ripemd160(&sha3_256(public_key.as_bytes()));

    let mut raw = [0u8; RAW_LEN];
    raw[0] = network.identifier();
    raw[1..BODY_LEN].copy_from_slice(&key_hash);
    let checksum = sha3_256(&raw[..BODY_LEN]);
    raw[BODY_LEN..].copy_from_slice(&checksum[..CHECKSUM_LEN]);

    let encoded = encode_base32(&raw);
    debug_assert_eq!(encoded.len(), ADDRESS_LEN);
    Address::new_unchecked(encoded)
}

/// Decode an address into its raw 24 bytes, verifying the checksum.
pub fn decode_address(address: &Address) -> Option<[u8; RAW_LEN]> {
    let raw: [u8; RAW_LEN] = decode_base32_fixed(address.as_str())?;
    let checksum = sha3_256(&raw[..BODY_LEN]);
    if raw[BODY_LEN..] != checksum[..CHECKSUM_LEN] {
        return None;
    }
    Some(raw)
}

/// Whether the address carries a valid checksum.
///
/// Format validation alone accepts any 39 base32 characters; this is the
/// stricter check.
pub fn verify_address_checksum(address: &Address) -> bool {
    decode_address(address).is_some()
}
