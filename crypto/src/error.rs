use cosign_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("private key is all zeroes")]
    WeakKey,

    #[error("cannot cosign an all-zero transaction hash")]
    ZeroHash,

    #[error("produced signature failed self-verification")]
    SelfVerification,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Crypto
    }
}
