use std::sync::Arc;

use jobboard_common::config::AppConfig;
use jobboard_common::document::DocumentStore;
use jobboard_common::identity::IdentityProvider;
use jobboard_common::storage::BlobStore;
use tracing::info;

use crate::auth::IdentityClient;
use crate::cv_analysis::CvAnalysisClient;
use crate::documents::DocumentClient;
use crate::error::ClientError;
use crate::local_storage::LocalStorage;
use crate::session::Session;
use crate::stores::{JobFilterStore, JobStore, UserStore};
use crate::uploads::StorageClient;

/// The services a [`JobBoard`] talks to.
#[derive(Clone)]
pub struct Backends {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub local_storage: Arc<LocalStorage>,
}

/// Every client and view store wired to one set of backends.
pub struct JobBoard {
    pub identity: IdentityClient,
    pub documents: DocumentClient,
    pub uploads: StorageClient,
    pub cv_analysis: CvAnalysisClient,
    pub local_storage: Arc<LocalStorage>,
    pub user_store: UserStore,
    pub job_store: JobStore,
    pub job_filter: JobFilterStore,
    config: AppConfig,
}

impl JobBoard {
    pub async fn new(config: AppConfig, backends: Backends) -> Result<Self, ClientError> {
        let uploads = StorageClient::new(backends.blobs);
        let documents = DocumentClient::new(backends.documents, uploads.clone(), &config);
        let identity = IdentityClient::new(
            backends.identity.clone(),
            documents.clone(),
            backends.local_storage.clone(),
        );
        let cv_analysis = CvAnalysisClient::new(&config.cv_analysis, backends.identity)?;

        Ok(Self {
            identity,
            documents,
            uploads,
            cv_analysis,
            user_store: UserStore::load(backends.local_storage.clone()).await,
            job_store: JobStore::load(backends.local_storage.clone()).await,
            job_filter: JobFilterStore::new(),
            local_storage: backends.local_storage,
            config,
        })
    }

    /// Build the local backends selected by `config` and wire them up.
    #[cfg(feature = "local")]
    pub async fn open(config: AppConfig) -> Result<Self, ClientError> {
        use jobboard_common::config::BackendKind;
        use jobboard_common::document::filesystem::FilesystemDocumentStore;
        use jobboard_common::document::memory::MemoryDocumentStore;
        use jobboard_common::identity::local::LocalIdentityProvider;
        use jobboard_common::storage::filesystem::FilesystemBlobStore;
        use jobboard_common::storage::memory::MemoryBlobStore;

        let documents: Arc<dyn DocumentStore> = match config.documents.backend {
            BackendKind::Memory => Arc::new(MemoryDocumentStore::new()),
            BackendKind::Filesystem => {
                Arc::new(FilesystemDocumentStore::new(config.documents.path.clone()).await?)
            }
        };

        let blobs: Arc<dyn BlobStore> = match config.storage.backend {
            BackendKind::Memory => Arc::new(MemoryBlobStore::default()),
            BackendKind::Filesystem => {
                let store =
                    FilesystemBlobStore::new(config.storage.path.clone(), config.storage.max_size)
                        .await?;
                match &config.storage.public_base_url {
                    Some(url) => Arc::new(store.with_public_base_url(url.clone())),
                    None => Arc::new(store),
                }
            }
        };

        let identity: Arc<dyn IdentityProvider> =
            Arc::new(LocalIdentityProvider::open(&config.identity).await?);

        let local_storage = Arc::new(match &config.session.local_storage_file {
            Some(path) => LocalStorage::open(path.clone()).await?,
            None => LocalStorage::in_memory(),
        });

        info!(
            documents = ?config.documents.backend,
            storage = ?config.storage.backend,
            "Opened local backends"
        );

        let backends = Backends {
            documents,
            blobs,
            identity,
            local_storage,
        };
        Self::new(config, backends).await
    }

    pub fn session(&self) -> Session {
        self.identity.session()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Page size used when the caller does not pick one.
    pub fn default_page_size(&self) -> usize {
        self.config.documents.default_page_size
    }
}
