use cosign_client::ApiError;
use cosign_registry::RegistryError;
use cosign_store::StoreError;
use cosign_types::ErrorKind;
use thiserror::Error;

use crate::signing::SigningError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl CoreError {
    /// Taxonomy class of an expected failure. `None` for configuration and
    /// storage faults, which are not part of the cosigning flow.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Config(_) | Self::Store(_) => None,
            Self::Registry(e) => Some(e.kind()),
            Self::Api(e) => Some(e.kind()),
            Self::Signing(e) => Some(e.kind()),
        }
    }
}
