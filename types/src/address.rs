//! Account address type.
//!
//! Plain form: 39 characters drawn from the RFC 4648 base32 alphabet
//! (`A`–`Z`, `2`–`7`). Pretty form: the same characters split into groups of
//! six by hyphens (45 characters in total, last group of three).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::NetworkType;

/// Length of a normalized address.
pub const ADDRESS_LEN: usize = 39;

/// Length of the hyphenated (pretty) address form.
pub const PRETTY_ADDRESS_LEN: usize = 45;

/// Positions of the hyphens in the pretty form.
pub const HYPHEN_OFFSETS: [usize; 6] = [6, 13, 20, 27, 34, 41];

/// Base32 alphabet (RFC 4648, no padding character).
pub const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must be {ADDRESS_LEN} characters without hyphens, got {0}")]
    Length(usize),

    #[error("hyphens must separate groups of six characters")]
    HyphenPlacement,

    #[error("address contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A normalized account address (uppercase, no hyphens, 39 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize user input.
    ///
    /// Hyphens are stripped and letters uppercased. A 45-character input
    /// containing hyphens must carry them exactly at [`HYPHEN_OFFSETS`].
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AddressError::Empty);
        }

        if input.chars().count() == PRETTY_ADDRESS_LEN && input.contains('-') {
            let misplaced = input.chars().enumerate().any(|(i, c)| {
                let expected_hyphen = HYPHEN_OFFSETS.contains(&i);
                (c == '-') != expected_hyphen
            });
            if misplaced {
                return Err(AddressError::HyphenPlacement);
            }
        }

        let normalized: String = input
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let len = normalized.chars().count();
        if len != ADDRESS_LEN {
            return Err(AddressError::Length(len));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !c.is_ascii() || !BASE32_ALPHABET.contains(&(*c as u8)))
        {
            return Err(AddressError::InvalidCharacter(bad));
        }

        Ok(Self(normalized))
    }

    /// Wrap an already-encoded address.
    ///
    /// Only for producers that generate the encoding themselves (address
    /// derivation); user input must go through [`Address::parse`].
    pub fn new_unchecked(encoded: String) -> Self {
        debug_assert_eq!(encoded.len(), ADDRESS_LEN);
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Network inferred from the leading character, if it is a known prefix.
    pub fn network(&self) -> Option<NetworkType> {
        self.0.chars().next().and_then(NetworkType::from_address_prefix)
    }

    /// Hyphenated display form, e.g. `NAAAAA-BBBBBB-...-XYZ`.
    pub fn pretty(&self) -> String {
        let mut out = String::with_capacity(PRETTY_ADDRESS_LEN);
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 && i % 6 == 0 {
                out.push('-');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "NAR3W7B4BCOZSZMFIZRYB3N5YGOUSWIYJCJ6HDA";

    #[test]
    fn accepts_plain_uppercase() {
        let addr = Address::parse(PLAIN).unwrap();
        assert_eq!(addr.as_str(), PLAIN);
    }

    #[test]
    fn normalizes_case_and_hyphens() {
        let pretty = "nar3w7-b4bcoz-szmfiz-ryb3n5-ygousw-iyjcj6-hda";
        let addr = Address::parse(pretty).unwrap();
        assert_eq!(addr.as_str(), PLAIN);
    }

    #[test]
    fn pretty_round_trips() {
        let addr = Address::parse(PLAIN).unwrap();
        let pretty = addr.pretty();
        assert_eq!(pretty.len(), PRETTY_ADDRESS_LEN);
        assert_eq!(Address::parse(&pretty).unwrap(), addr);
    }

    #[test]
    fn rejects_misplaced_hyphens_in_pretty_form() {
        let bad = "NAR3W7B-4BCOZ-SZMFIZ-RYB3N5-YGOUSW-IYJCJ6-HDA";
        assert_eq!(bad.len(), PRETTY_ADDRESS_LEN);
        assert_eq!(Address::parse(bad), Err(AddressError::HyphenPlacement));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(Address::parse("NAR3W7"), Err(AddressError::Length(6)));
        assert_eq!(Address::parse(""), Err(AddressError::Empty));
        assert_eq!(Address::parse("   "), Err(AddressError::Empty));
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        let with_one = PLAIN.replacen('A', "1", 1);
        assert_eq!(
            Address::parse(&with_one),
            Err(AddressError::InvalidCharacter('1'))
        );
        let with_eight = PLAIN.replacen('A', "8", 1);
        assert_eq!(
            Address::parse(&with_eight),
            Err(AddressError::InvalidCharacter('8'))
        );
    }

    #[test]
    fn network_from_prefix() {
        let mainnet = Address::parse(PLAIN).unwrap();
        assert_eq!(mainnet.network(), Some(NetworkType::Mainnet));

        let testnet = Address::parse(&PLAIN.replacen('N', "T", 1)).unwrap();
        assert_eq!(testnet.network(), Some(NetworkType::Testnet));

        let other = Address::parse(&PLAIN.replacen('N', "A", 1)).unwrap();
        assert_eq!(other.network(), None);
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let json = format!("\"{PLAIN}\"");
        let addr: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr.as_str(), PLAIN);
        assert!(serde_json::from_str::<Address>("\"NOPE\"").is_err());
    }
}
