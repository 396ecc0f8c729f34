use std::collections::BTreeMap;
use std::path::PathBuf;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, info};

use super::error::IdentityError;
use super::traits::{AuthUser, FederatedCredential, IdentityProvider, PASSWORD_PROVIDER};
use crate::config::IdentityConfig;
use crate::validation::{MIN_PASSWORD_LEN, validate_email};

/// Claims carried by id tokens issued by [`LocalIdentityProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub email: String,
    pub provider: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    uid: String,
    email: String,
    #[serde(default)]
    password_hash: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    provider: String,
    #[serde(default)]
    federated_subject: Option<String>,
}

impl StoredAccount {
    fn to_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
            provider: self.provider.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IdentityState {
    /// Keyed by uid.
    accounts: BTreeMap<String, StoredAccount>,
    current_uid: Option<String>,
}

/// Self-contained identity provider.
///
/// Passwords are stored as argon2 hashes, id tokens are HS256 JWTs, and
/// federated assertions are trusted for the configured provider ids. With a
/// state file, accounts and the signed-in uid survive restarts.
pub struct LocalIdentityProvider {
    state: RwLock<IdentityState>,
    session: watch::Sender<Option<AuthUser>>,
    cached_token: Mutex<Option<(String, IdTokenClaims)>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    federated_providers: Vec<String>,
    state_file: Option<PathBuf>,
}

impl LocalIdentityProvider {
    /// Open the provider, restoring accounts and session from the state file
    /// when one is configured and present.
    pub async fn open(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let state = match &config.state_file {
            Some(path) => match fs::read(path).await {
                Ok(bytes) => serde_json::from_slice(&bytes)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => IdentityState::default(),
                Err(e) => return Err(e.into()),
            },
            None => IdentityState::default(),
        };

        let token_ttl = token_ttl(config.token_ttl_secs)?;
        Ok(Self::with_state(config, state, token_ttl))
    }

    /// In-memory provider with default settings and one-hour tokens.
    pub fn in_memory() -> Self {
        Self::with_state(
            &IdentityConfig::default(),
            IdentityState::default(),
            Duration::hours(1),
        )
    }

    fn with_state(config: &IdentityConfig, state: IdentityState, token_ttl: Duration) -> Self {
        let current = state
            .current_uid
            .as_ref()
            .and_then(|uid| state.accounts.get(uid))
            .map(StoredAccount::to_user);
        let (session, _) = watch::channel(current);

        Self {
            state: RwLock::new(state),
            session,
            cached_token: Mutex::new(None),
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            token_ttl,
            federated_providers: config.federated_providers.clone(),
            state_file: config.state_file.clone(),
        }
    }

    /// Verify an id token issued by this provider and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<IdTokenClaims, IdentityError> {
        let data = decode::<IdTokenClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| IdentityError::Token(e.to_string()))?;
        Ok(data.claims)
    }

    async fn persist(&self, state: &IdentityState) -> Result<(), IdentityError> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_vec_pretty(state)?).await?;
        Ok(())
    }

    /// Make `uid` the current session and notify subscribers.
    async fn start_session(
        &self,
        state: &mut IdentityState,
        user: AuthUser,
    ) -> Result<AuthUser, IdentityError> {
        let previous = state.current_uid.replace(user.uid.clone());
        if let Err(e) = self.persist(state).await {
            state.current_uid = previous;
            return Err(e);
        }
        *self.cached_token.lock().await = None;
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Register `account` and sign it in. The account is dropped again when
    /// the state cannot be persisted.
    async fn start_new_session(
        &self,
        state: &mut IdentityState,
        account: StoredAccount,
    ) -> Result<AuthUser, IdentityError> {
        let uid = account.uid.clone();
        let user = account.to_user();
        state.accounts.insert(uid.clone(), account);
        let started = self.start_session(state, user).await;
        if started.is_err() {
            state.accounts.remove(&uid);
        }
        started
    }

    fn issue_token(&self, user: &AuthUser) -> Result<(String, IdTokenClaims), IdentityError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| IdentityError::Token("token lifetime overflow".into()))?;
        let claims = IdTokenClaims {
            sub: user.uid.clone(),
            email: user.email.clone(),
            provider: user.provider.clone(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Token(e.to_string()))?;
        Ok((token, claims))
    }
}

fn token_ttl(secs: u64) -> Result<Duration, IdentityError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| IdentityError::InvalidConfig(format!("token_ttl_secs {secs} is out of range")))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_uid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt).map_err(|e| IdentityError::Unavailable(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Unavailable(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError> {
        let email = normalize_email(email);
        if !validate_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut state = self.state.write().await;
        if state.accounts.values().any(|account| account.email == email) {
            return Err(IdentityError::EmailAlreadyInUse);
        }

        let account = StoredAccount {
            uid: new_uid(),
            email,
            password_hash: Some(hash_password(password)?),
            display_name: None,
            photo_url: None,
            provider: PASSWORD_PROVIDER.to_string(),
            federated_subject: None,
        };
        let user = self.start_new_session(&mut state, account).await?;
        info!(uid = %user.uid, "Identity created");
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, IdentityError> {
        let email = normalize_email(email);
        if !validate_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }

        let mut state = self.state.write().await;
        let user = state
            .accounts
            .values()
            .find(|account| account.email == email && account.provider == PASSWORD_PROVIDER)
            .filter(|account| {
                account
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| verify_password(password, hash))
            })
            .map(StoredAccount::to_user)
            .ok_or(IdentityError::InvalidCredential)?;
        debug!(uid = %user.uid, "Password sign-in");
        self.start_session(&mut state, user).await
    }

    async fn sign_in_with_federated(
        &self,
        credential: &FederatedCredential,
    ) -> Result<AuthUser, IdentityError> {
        if !self
            .federated_providers
            .iter()
            .any(|provider| provider == &credential.provider_id)
        {
            return Err(IdentityError::FederatedRejected(format!(
                "provider '{}' is not enabled",
                credential.provider_id
            )));
        }
        if credential.subject.trim().is_empty() {
            return Err(IdentityError::FederatedRejected("missing subject".into()));
        }

        let mut state = self.state.write().await;
        let existing = state
            .accounts
            .values()
            .find(|account| {
                account.provider == credential.provider_id
                    && account.federated_subject.as_deref() == Some(credential.subject.as_str())
            })
            .map(StoredAccount::to_user);

        match existing {
            Some(user) => self.start_session(&mut state, user).await,
            None => {
                let account = StoredAccount {
                    uid: new_uid(),
                    email: normalize_email(&credential.email),
                    password_hash: None,
                    display_name: credential.display_name.clone(),
                    photo_url: credential.photo_url.clone(),
                    provider: credential.provider_id.clone(),
                    federated_subject: Some(credential.subject.clone()),
                };
                let user = self.start_new_session(&mut state, account).await?;
                info!(uid = %user.uid, provider = %user.provider, "Federated identity created");
                Ok(user)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let mut state = self.state.write().await;
        state.current_uid = None;
        self.persist(&state).await?;
        *self.cached_token.lock().await = None;
        self.session.send_replace(None);
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
        let mut state = self.state.write().await;
        if state.accounts.remove(uid).is_none() {
            return Err(IdentityError::UserNotFound(uid.to_string()));
        }
        let was_current = state.current_uid.as_deref() == Some(uid);
        if was_current {
            state.current_uid = None;
        }
        self.persist(&state).await?;
        if was_current {
            *self.cached_token.lock().await = None;
            self.session.send_replace(None);
        }
        info!(uid, "Identity deleted");
        Ok(())
    }

    async fn id_token(&self, force_refresh: bool) -> Result<String, IdentityError> {
        let user = self.current_user().ok_or(IdentityError::NotSignedIn)?;

        let mut cached = self.cached_token.lock().await;
        if !force_refresh
            && let Some((token, claims)) = cached.as_ref()
            && claims.sub == user.uid
            && claims.exp > Utc::now().timestamp() as usize + 60
        {
            return Ok(token.clone());
        }

        let (token, claims) = self.issue_token(&user)?;
        *cached = Some((token.clone(), claims));
        Ok(token)
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.session.subscribe()
    }
}
