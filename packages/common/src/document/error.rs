use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by a document store backend.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document reference: {0}")]
    InvalidReference(String),

    #[error("document IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for DocumentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => Self::Io(e),
            other => Self::InvalidReference(other.to_string()),
        }
    }
}
