use cosign_types::{Address, AddressError, ErrorKind, NetworkType, NodeId};
use thiserror::Error;

/// Rejected user input. Each variant is a distinct, user-correctable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("node URL is empty")]
    EmptyUrl,

    #[error("node URL cannot be parsed: {0}")]
    UnparsableUrl(String),

    #[error("node URL must use https, got {0:?}")]
    Scheme(String),

    #[error("node port must be 3000 or 3001, got {0}")]
    Port(u16),

    #[error("node host {0:?} is not allowed")]
    Host(String),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("address {0} is not registered")]
    AddressNotFound(Address),

    #[error("node {0} is not registered")]
    NodeNotFound(NodeId),

    #[error("address {0} is already registered")]
    DuplicateAddress(Address),

    #[error("node {url} is already registered on {network}")]
    DuplicateNode { url: String, network: NetworkType },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::AddressNotFound(_) | Self::NodeNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateAddress(_) | Self::DuplicateNode { .. } => ErrorKind::Conflict,
        }
    }
}

impl From<AddressError> for RegistryError {
    fn from(e: AddressError) -> Self {
        Self::Validation(ValidationError::Address(e))
    }
}
