use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    #[error("store file is corrupted: {0}")]
    Corruption(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
