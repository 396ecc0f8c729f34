use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::error::IdentityError;

/// Provider id reported for email/password accounts.
pub const PASSWORD_PROVIDER: &str = "password";

/// The signed-in principal as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// `"password"` or the federated provider id (e.g. `"google.com"`).
    pub provider: String,
}

/// An assertion obtained from an external provider's sign-in flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedCredential {
    pub provider_id: String,
    /// Stable subject id of the account at the provider.
    pub subject: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Identity provider: account creation, sign-in flows and the current session.
///
/// Successful `create_user` and sign-in calls make the returned user the
/// current session and publish it to every subscriber.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, IdentityError>;

    async fn sign_in_with_federated(
        &self,
        credential: &FederatedCredential,
    ) -> Result<AuthUser, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Delete an account. Signs it out first if it is the current session.
    async fn delete_user(&self, uid: &str) -> Result<(), IdentityError>;

    /// Signed id token for the current session.
    async fn id_token(&self, force_refresh: bool) -> Result<String, IdentityError>;

    /// Session-changed notifications; the current value is the signed-in user.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;

    fn current_user(&self) -> Option<AuthUser> {
        self.subscribe().borrow().clone()
    }
}
