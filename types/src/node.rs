//! Node identity and health enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic node identifier derived from normalized URL + network type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Liveness of a node as of its last health check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl NodeStatus {
    /// Sort key: online first, then unknown, then offline.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Online => 0,
            Self::Unknown => 1,
            Self::Offline => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection quality bucket derived from response latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl ConnectionQuality {
    /// Thresholds: <100ms excellent, <500ms good, <2000ms fair, else poor.
    pub fn from_response_time(millis: Option<u64>) -> Self {
        match millis {
            None => Self::Unknown,
            Some(ms) if ms < 100 => Self::Excellent,
            Some(ms) if ms < 500 => Self::Good,
            Some(ms) if ms < 2000 => Self::Fair,
            Some(_) => Self::Poor,
        }
    }

    /// Sort key: excellent first, unknown last.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Excellent => 0,
            Self::Good => 1,
            Self::Fair => 2,
            Self::Poor => 3,
            Self::Unknown => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_thresholds() {
        use ConnectionQuality::*;
        assert_eq!(ConnectionQuality::from_response_time(Some(50)), Excellent);
        assert_eq!(ConnectionQuality::from_response_time(Some(99)), Excellent);
        assert_eq!(ConnectionQuality::from_response_time(Some(100)), Good);
        assert_eq!(ConnectionQuality::from_response_time(Some(300)), Good);
        assert_eq!(ConnectionQuality::from_response_time(Some(1000)), Fair);
        assert_eq!(ConnectionQuality::from_response_time(Some(2000)), Poor);
        assert_eq!(ConnectionQuality::from_response_time(Some(3000)), Poor);
        assert_eq!(ConnectionQuality::from_response_time(None), Unknown);
    }

    #[test]
    fn status_order() {
        assert!(NodeStatus::Online.priority() < NodeStatus::Unknown.priority());
        assert!(NodeStatus::Unknown.priority() < NodeStatus::Offline.priority());
    }
}
