use std::sync::Arc;

use jobboard_common::ReturnType;
use jobboard_common::identity::{AuthUser, FederatedCredential, IdentityError, IdentityProvider};
use jobboard_common::models::{FirmAccount, FirmRegistration, UserAccount, UserRegistration, timestamp};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::documents::DocumentClient;
use crate::error::ClientError;
use crate::local_storage::LocalStorage;
use crate::session::Session;

/// Account lifecycle on top of an [`IdentityProvider`]: registration with
/// the matching profile document, sign-in flows and sign-out.
#[derive(Clone)]
pub struct IdentityClient {
    provider: Arc<dyn IdentityProvider>,
    documents: DocumentClient,
    local_storage: Arc<LocalStorage>,
}

impl IdentityClient {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        documents: DocumentClient,
        local_storage: Arc<LocalStorage>,
    ) -> Self {
        Self {
            provider,
            documents,
            local_storage,
        }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    pub fn session(&self) -> Session {
        Session::new(self.provider.subscribe())
    }

    /// Create an identity and its user profile.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register_user(&self, form: &UserRegistration) -> ReturnType {
        let user = match self.provider.create_user(&form.email, &form.password).await {
            Ok(user) => user,
            Err(e) => return registration_error(e),
        };

        let account = UserAccount {
            uid: user.uid.clone(),
            email: user.email.clone(),
            name: form.name.clone(),
            telephone: form.telephone.clone(),
            profile_pic: self.documents.default_profile_picture.clone(),
            is_firm: false,
            created_at: timestamp::now(),
        };
        let written = self.documents.put_user_account(&account).await;
        self.finish_registration(&user, written).await
    }

    /// Create an identity and its firm profile.
    #[instrument(skip(self, form), fields(email = %form.email, company = %form.company_name))]
    pub async fn register_firm(&self, form: &FirmRegistration) -> ReturnType {
        let user = match self.provider.create_user(&form.email, &form.password).await {
            Ok(user) => user,
            Err(e) => return registration_error(e),
        };

        let account = FirmAccount {
            uid: user.uid.clone(),
            email: user.email.clone(),
            company_name: form.company_name.clone(),
            representative_name: form.representative_name.clone(),
            tax_id: form.tax_id.clone(),
            telephone: form.telephone.clone(),
            profile_pic: self.documents.default_profile_picture.clone(),
            is_firm: true,
            created_at: timestamp::now(),
        };
        let written = self.documents.put_firm_account(&account).await;
        self.finish_registration(&user, written).await
    }

    /// Roll the identity back when its profile could not be written.
    async fn finish_registration(
        &self,
        user: &AuthUser,
        written: Result<(), ClientError>,
    ) -> ReturnType {
        match written {
            Ok(()) => {
                self.local_storage.set_logged_in_flag().await;
                info!(uid = %user.uid, "Account registered");
                ReturnType::Success
            }
            Err(e) => {
                error!(uid = %user.uid, error = %e, "Error writing account document");
                if let Err(rollback) = self.provider.delete_user(&user.uid).await {
                    error!(uid = %user.uid, error = %rollback, "Failed to roll back identity");
                }
                ReturnType::RegistrationFailed
            }
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login_with_email(&self, email: &str, password: &str) -> ReturnType {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(user) => {
                self.local_storage.set_logged_in_flag().await;
                info!(uid = %user.uid, "Signed in");
                ReturnType::Success
            }
            Err(IdentityError::InvalidCredential | IdentityError::InvalidEmail) => {
                warn!("Rejected credentials");
                ReturnType::InvalidCredentials
            }
            Err(e) => {
                error!(error = %e, "Login error");
                ReturnType::LoginFailed
            }
        }
    }

    /// Sign in with an external provider's assertion. The caller creates
    /// the profile of a first-time account with
    /// [`DocumentClient::ensure_user_document`].
    #[instrument(skip(self, credential), fields(provider = %credential.provider_id))]
    pub async fn login_with_federated(&self, credential: &FederatedCredential) -> ReturnType {
        match self.provider.sign_in_with_federated(credential).await {
            Ok(user) => {
                self.local_storage.set_logged_in_flag().await;
                info!(uid = %user.uid, "Signed in with federated provider");
                ReturnType::Success
            }
            Err(e) => {
                error!(error = %e, "Federated login error");
                ReturnType::FederatedLoginFailed
            }
        }
    }

    /// Sign out and clear the logged-in flag. Failures are only logged.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.local_storage.delete_logged_in_flag().await;
                info!("Signed out");
            }
            Err(e) => error!(error = %e, "Error signing out"),
        }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.provider.current_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.provider.subscribe()
    }

    pub async fn id_token(&self, force_refresh: bool) -> Result<String, IdentityError> {
        self.provider.id_token(force_refresh).await
    }
}

fn registration_error(e: IdentityError) -> ReturnType {
    match e {
        IdentityError::EmailAlreadyInUse => {
            warn!("Email already in use");
            ReturnType::EmailInUse
        }
        IdentityError::WeakPassword => ReturnType::WeakPassword,
        e => {
            error!(error = %e, "Registration error");
            ReturnType::RegistrationFailed
        }
    }
}
