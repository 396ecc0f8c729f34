use async_trait::async_trait;

use super::error::StorageError;
use super::path::ObjectPath;

/// Path-addressed object storage with public download URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at `path`, replacing any previous object.
    async fn put(&self, path: &ObjectPath, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, path: &ObjectPath) -> Result<Vec<u8>, StorageError>;

    /// Resolve the public download URL of a stored object.
    async fn download_url(&self, path: &ObjectPath) -> Result<String, StorageError>;
}
