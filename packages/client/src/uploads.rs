use std::sync::Arc;

use chrono::Utc;
use jobboard_common::models::FileUpload;
use jobboard_common::storage::{BlobStore, ObjectPath, StorageError};
use tracing::{error, instrument};

/// Uploads user files to the blob store.
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn BlobStore>,
}

impl StorageClient {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Upload `file` to `{folder}/{owner_id}_{unix_millis}[.ext]` and return its
    /// download URL, or `None` if anything fails.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_file(&self, file: &FileUpload, owner_id: &str, folder: &str) -> Option<String> {
        match self.try_upload(file, owner_id, folder).await {
            Ok(url) => Some(url),
            Err(e) => {
                error!(error = %e, "Error uploading file to storage");
                None
            }
        }
    }

    async fn try_upload(
        &self,
        file: &FileUpload,
        owner_id: &str,
        folder: &str,
    ) -> Result<String, StorageError> {
        let millis = Utc::now().timestamp_millis();
        let name = match file.extension() {
            Some(ext) => format!("{owner_id}_{millis}.{ext}"),
            None => format!("{owner_id}_{millis}"),
        };
        let path = ObjectPath::join(folder, &name)?;
        self.store.put(&path, &file.bytes).await?;
        self.store.download_url(&path).await
    }
}
