use thiserror::Error;

/// Errors raised by an identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email address is already in use")]
    EmailAlreadyInUse,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("password is too weak")]
    WeakPassword,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("federated sign-in rejected: {0}")]
    FederatedRejected(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("identity IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("identity state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identity config: {0}")]
    InvalidConfig(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
