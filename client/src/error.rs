use cosign_types::{AddressError, ErrorKind};
use thiserror::Error;

/// Failure of a REST interaction with a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("invalid node URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("could not reach node: {0}")]
    Network(String),

    #[error("resource not found")]
    NotFound,

    #[error("invalid request parameters")]
    InvalidParameters,

    #[error("node rejected the request content as invalid")]
    InvalidContent,

    #[error("cosignature failed node validation")]
    ValidationFailed,

    #[error("server error (HTTP {0})")]
    Server(u16),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unsupported network identifier {0}")]
    UnsupportedNetwork(u64),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter(_) | Self::InvalidAddress(_) | Self::InvalidUrl(_) => {
                ErrorKind::Validation
            }
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::NotFound
            | Self::InvalidParameters
            | Self::InvalidContent
            | Self::ValidationFailed
            | Self::Server(_)
            | Self::UnexpectedStatus(_)
            | Self::MalformedResponse(_)
            | Self::UnsupportedNetwork(_) => ErrorKind::Protocol,
        }
    }

    /// Whether the failure happened below HTTP (no status was received).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_distinct_from_http_errors() {
        assert!(ApiError::Timeout(10).is_transport());
        assert!(ApiError::Network("refused".into()).is_transport());
        assert!(!ApiError::Server(500).is_transport());
        assert_eq!(ApiError::Timeout(10).kind(), ErrorKind::Timeout);
        assert_eq!(ApiError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(ApiError::NotFound.kind(), ErrorKind::Protocol);
        assert_eq!(
            ApiError::MissingParameter("address").kind(),
            ErrorKind::Validation
        );
    }
}
