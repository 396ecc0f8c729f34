use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "JOBBOARD_CONFIG";

/// Application configuration.
///
/// Layered as: built-in defaults, then `config/config.toml` (or the file named
/// by `JOBBOARD_CONFIG`), then `JOBBOARD__SECTION__KEY` environment variables.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub collections: CollectionsConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub cv_analysis: CvAnalysisConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::build(File::from(PathBuf::from(path)).required(true)),
            Err(_) => Self::build(File::with_name("config/config").required(false)),
        }
    }

    /// Load with an explicit config file instead of the default location.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path.to_path_buf()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            // e.g. JOBBOARD__CV_ANALYSIS__BASE_URL
            .add_source(
                Environment::with_prefix("JOBBOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("identity.federated_providers"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Collection names in the document store.
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionsConfig {
    #[serde(default = "default_users_collection")]
    pub users: String,
    #[serde(default = "default_firms_collection")]
    pub firms: String,
    #[serde(default = "default_jobs_collection")]
    pub jobs: String,
    #[serde(default = "default_applications_collection")]
    pub applications: String,
    #[serde(default = "default_skills_collection")]
    pub skills: String,
}

fn default_users_collection() -> String {
    "users".into()
}
fn default_firms_collection() -> String {
    "firms".into()
}
fn default_jobs_collection() -> String {
    "job_ads".into()
}
fn default_applications_collection() -> String {
    "job_applications".into()
}
fn default_skills_collection() -> String {
    "skills".into()
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            users: default_users_collection(),
            firms: default_firms_collection(),
            jobs: default_jobs_collection(),
            applications: default_applications_collection(),
            skills: default_skills_collection(),
        }
    }
}

/// Which local implementation backs a store.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    Filesystem,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Root directory of the filesystem backend. Default: "./data/documents".
    #[serde(default = "default_documents_path")]
    pub path: PathBuf,
    /// Page size used when the caller does not pass one. Default: 10.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_documents_path() -> PathBuf {
    PathBuf::from("./data/documents")
}
fn default_page_size() -> usize {
    10
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_documents_path(),
            default_page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Root directory of the filesystem backend. Default: "./data/blobs".
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Largest object the filesystem backend accepts. Default: 10 MiB.
    #[serde(default = "default_max_size")]
    pub max_size: u64,
    /// Base URL download links are served from; `file://` links when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default = "default_cv_folder")]
    pub cv_folder: String,
    #[serde(default = "default_profile_picture_folder")]
    pub profile_picture_folder: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/blobs")
}
fn default_max_size() -> u64 {
    10 * 1024 * 1024
}
fn default_cv_folder() -> String {
    "job_applications".into()
}
fn default_profile_picture_folder() -> String {
    "profile_pictures".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_storage_path(),
            max_size: default_max_size(),
            public_base_url: None,
            cv_folder: default_cv_folder(),
            profile_picture_folder: default_profile_picture_folder(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    /// HMAC secret for id tokens issued by the local provider.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Id token lifetime in seconds. Default: 3600.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// Federated providers whose assertions are accepted. Default: ["google.com"].
    #[serde(default = "default_federated_providers")]
    pub federated_providers: Vec<String>,
    /// Where the local provider keeps accounts and the signed-in uid.
    /// In-memory only when unset.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

fn default_token_secret() -> String {
    "jobboard-local-identity-secret".into()
}
fn default_token_ttl_secs() -> u64 {
    3600
}
fn default_federated_providers() -> Vec<String> {
    vec!["google.com".into()]
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            federated_providers: default_federated_providers(),
            state_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CvAnalysisConfig {
    /// Base URL of the CV analysis service. Default: "http://localhost:5000".
    #[serde(default = "default_cv_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Default: 60.
    #[serde(default = "default_cv_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cv_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_cv_timeout_secs() -> u64 {
    60
}

impl Default for CvAnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_cv_base_url(),
            timeout_secs: default_cv_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// JSON file backing local storage (logged-in flag, persisted stores).
    /// In-memory only when unset.
    #[serde(default)]
    pub local_storage_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    /// Picture shown for firms without one. Default: "default_profile_picture.png".
    #[serde(default = "default_profile_picture")]
    pub default_profile_picture: String,
    /// Name given to profiles created without one. Default: "Anonymous".
    #[serde(default = "default_user_name")]
    pub default_user_name: String,
}

fn default_profile_picture() -> String {
    "default_profile_picture.png".into()
}
fn default_user_name() -> String {
    "Anonymous".into()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_profile_picture: default_profile_picture(),
            default_user_name: default_user_name(),
        }
    }
}
