//! Serde helpers for uint64 values, which REST nodes encode as decimal strings.

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a `u64` as a decimal string.
pub fn u64_as_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Deserialize a `u64` from either a decimal string or a JSON number.
pub fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Repr::Number(n) => Ok(n),
    }
}
