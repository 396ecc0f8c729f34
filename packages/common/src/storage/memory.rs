use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::path::ObjectPath;
use super::traits::BlobStore;

/// In-process object store, mainly for tests and demos.
pub struct MemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<ObjectPath, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Paths of all stored objects, sorted.
    pub async fn paths(&self) -> Vec<ObjectPath> {
        let mut paths: Vec<_> = self.objects.read().await.keys().cloned().collect();
        paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        paths
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("local")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &ObjectPath, data: &[u8]) -> Result<(), StorageError> {
        self.objects.write().await.insert(path.clone(), data.to_vec());
        Ok(())
    }

    async fn get(&self, path: &ObjectPath) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn download_url(&self, path: &ObjectPath) -> Result<String, StorageError> {
        if !self.objects.read().await.contains_key(path) {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(format!("memory://{}/{}", self.bucket, path))
    }
}
