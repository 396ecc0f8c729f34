use thiserror::Error;

/// Errors raised by a blob store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no object at {0}")]
    NotFound(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("object of {actual} bytes exceeds the {limit} byte limit")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
