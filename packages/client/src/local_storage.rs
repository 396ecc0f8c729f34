use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::fs;
use tokio::sync::RwLock;
use tracing::error;

use crate::error::ClientError;

/// Key of the "logged in" flag.
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

/// String key-value storage that survives restarts when backed by a file.
pub struct LocalStorage {
    items: RwLock<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Open file-backed storage, starting empty if the file does not exist.
    pub async fn open(path: PathBuf) -> Result<Self, ClientError> {
        let items = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            items: RwLock::new(items),
            path: Some(path),
        })
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), ClientError> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.into());
        self.flush(&items).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), ClientError> {
        let mut items = self.items.write().await;
        if items.remove(key).is_some() {
            self.flush(&items).await?;
        }
        Ok(())
    }

    pub async fn set_logged_in_flag(&self) {
        if self.is_logged_in().await {
            return;
        }
        if let Err(e) = self.set_item(LOGGED_IN_KEY, "true").await {
            error!(error = %e, "Failed to set logged-in flag");
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.get_item(LOGGED_IN_KEY).await.as_deref() == Some("true")
    }

    pub async fn delete_logged_in_flag(&self) {
        if let Err(e) = self.remove_item(LOGGED_IN_KEY).await {
            error!(error = %e, "Failed to clear logged-in flag");
        }
    }

    async fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_vec_pretty(items)?).await?;
        Ok(())
    }
}
