//! Error taxonomy shared across crates.
//!
//! Each crate keeps its own error enum; every one of them maps onto exactly
//! one [`ErrorKind`] so callers can treat failures uniformly.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed address, URL, key or hash. User-correctable.
    Validation,
    /// Unknown address or node id.
    NotFound,
    /// Duplicate add or invariant violation.
    Conflict,
    /// Connectivity failure.
    Network,
    /// Bounded wait exceeded.
    Timeout,
    /// Unexpected HTTP status or malformed response body.
    Protocol,
    /// The signing library rejected the key, hash or network.
    Crypto,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Protocol => "protocol",
            Self::Crypto => "crypto",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
