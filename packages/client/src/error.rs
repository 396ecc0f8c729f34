use jobboard_common::document::DocumentError;
use jobboard_common::identity::IdentityError;
use jobboard_common::storage::StorageError;
use thiserror::Error;

use crate::cv_analysis::CvAnalysisError;

/// Errors surfaced by the client operations that rethrow instead of mapping
/// to a [`ReturnType`](jobboard_common::ReturnType).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    CvAnalysis(#[from] CvAnalysisError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("local storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
