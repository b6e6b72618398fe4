//! Timestamps and network deadlines.
//!
//! [`Timestamp`] is wall-clock time in milliseconds since the Unix epoch.
//! [`Deadline`] is network time: milliseconds since the genesis instant of a
//! given network. `calendar = genesis + deadline`, exactly and reversibly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::NetworkType;

/// A Unix timestamp in milliseconds (UTC).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Current system time. A clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_secs(&self) -> u64 {
        self.0 / 1000
    }

    /// Milliseconds from `self` until `later` (zero if `later` is earlier).
    pub fn millis_until(&self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Transaction expiry in milliseconds since network genesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deadline(u64);

impl Deadline {
    pub fn new(network_millis: u64) -> Self {
        Self(network_millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Calendar time of this deadline on `network`.
    pub fn to_timestamp(&self, network: NetworkType) -> Timestamp {
        let genesis = Timestamp::from_secs(network.epoch_adjustment_secs());
        Timestamp::from_millis(genesis.as_millis().saturating_add(self.0))
    }

    /// Inverse of [`Deadline::to_timestamp`]. Instants before genesis clamp to zero.
    pub fn from_timestamp(timestamp: Timestamp, network: NetworkType) -> Self {
        let genesis = Timestamp::from_secs(network.epoch_adjustment_secs());
        Self(genesis.millis_until(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_adds_genesis_offset() {
        let deadline = Deadline::new(123_456);
        let ts = deadline.to_timestamp(NetworkType::Mainnet);
        assert_eq!(ts.as_millis(), 1_615_853_185_000 + 123_456);
    }

    #[test]
    fn deadline_round_trips() {
        for network in NetworkType::ALL {
            let deadline = Deadline::new(98_765_432_100);
            let ts = deadline.to_timestamp(network);
            assert_eq!(Deadline::from_timestamp(ts, network), deadline);
        }
    }

    #[test]
    fn networks_have_distinct_genesis() {
        let d = Deadline::new(0);
        assert_ne!(
            d.to_timestamp(NetworkType::Mainnet),
            d.to_timestamp(NetworkType::Testnet)
        );
    }

    #[test]
    fn millis_until_saturates() {
        let a = Timestamp::from_millis(10);
        let b = Timestamp::from_millis(25);
        assert_eq!(a.millis_until(b), 15);
        assert_eq!(b.millis_until(a), 0);
    }
}
