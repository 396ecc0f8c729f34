use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::path::ObjectPath;
use super::traits::BlobStore;

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{object path}`. Writes go to `{base_path}/.tmp`
/// first and are renamed into place, so readers never see a partial object.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
    public_base_url: Option<String>,
}

impl FilesystemBlobStore {
    /// Create a new filesystem object store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
            public_base_url: None,
        })
    }

    /// Serve download URLs from `base_url` instead of `file://` paths.
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.public_base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    fn object_path(&self, path: &ObjectPath) -> PathBuf {
        self.base_path.join(path.to_relative_path())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    fn check_size(&self, actual: u64) -> Result<(), StorageError> {
        if actual > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual,
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Move a fully written temp file to its object path. The temp file is
    /// removed if the move fails.
    async fn publish(&self, temp_path: &Path, path: &ObjectPath) -> Result<(), StorageError> {
        let target = self.object_path(path);
        let moved = async {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::rename(temp_path, &target).await
        }
        .await;
        if moved.is_err() {
            let _ = fs::remove_file(temp_path).await;
        }
        Ok(moved?)
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, path: &ObjectPath, data: &[u8]) -> Result<(), StorageError> {
        self.check_size(data.len() as u64)?;
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        self.publish(&temp_path, path).await
    }

    async fn get(&self, path: &ObjectPath) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.object_path(path)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn download_url(&self, path: &ObjectPath) -> Result<String, StorageError> {
        let target = self.object_path(path);
        if !fs::try_exists(&target).await? {
            return Err(StorageError::NotFound(path.to_string()));
        }
        match &self.public_base_url {
            Some(base) => Ok(format!("{base}/{path}")),
            None => {
                let absolute = fs::canonicalize(target).await?;
                Ok(format!("file://{}", absolute.display()))
            }
        }
    }
}
