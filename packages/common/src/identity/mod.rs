mod error;
mod traits;

#[cfg(feature = "local-identity")]
pub mod local;

pub use error::IdentityError;
pub use traits::{AuthUser, FederatedCredential, IdentityProvider, PASSWORD_PROVIDER};
