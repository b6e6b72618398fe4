//! Network type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two network types a cosigner can operate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// The production network.
    Mainnet,
    /// The public test network.
    Testnet,
}

impl NetworkType {
    pub const ALL: [NetworkType; 2] = [NetworkType::Mainnet, NetworkType::Testnet];

    /// Numeric identifier reported by `/node/info` and used as the first
    /// address byte.
    pub fn identifier(&self) -> u8 {
        match self {
            Self::Mainnet => 104,
            Self::Testnet => 152,
        }
    }

    /// Map a protocol identifier to a known network. Anything else is unsupported.
    pub fn from_identifier(id: u64) -> Option<Self> {
        match id {
            104 => Some(Self::Mainnet),
            152 => Some(Self::Testnet),
            _ => None,
        }
    }

    /// Leading character of every address on this network.
    pub fn address_prefix(&self) -> char {
        match self {
            Self::Mainnet => 'N',
            Self::Testnet => 'T',
        }
    }

    pub fn from_address_prefix(c: char) -> Option<Self> {
        match c {
            'N' => Some(Self::Mainnet),
            'T' => Some(Self::Testnet),
            _ => None,
        }
    }

    /// Genesis instant in seconds since the Unix epoch. Deadlines are
    /// millisecond offsets from this instant.
    pub fn epoch_adjustment_secs(&self) -> u64 {
        match self {
            Self::Mainnet => 1_615_853_185,
            Self::Testnet => 1_667_250_467,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            other => Err(format!("unknown network type: {other}")),
        }
    }
}
