use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobboard::{Backends, JobBoard, LocalStorage};
use jobboard_common::config::AppConfig;
use jobboard_common::document::memory::MemoryDocumentStore;
use jobboard_common::document::{Document, DocumentError, DocumentStore, Fields, Query, WriteMode};
use jobboard_common::identity::local::LocalIdentityProvider;
use jobboard_common::models::{
    ApplicationForm, FileUpload, FirmRegistration, JobForm, JobSkills, Position, UserRegistration,
};
use jobboard_common::storage::memory::MemoryBlobStore;
use jobboard_common::storage::{BlobStore, ObjectPath, StorageError};

pub const PASSWORD: &str = "secret-password";

/// Document store that can be told to fail writes, deletes or queries.
#[derive(Default)]
pub struct FlakyDocumentStore {
    pub inner: MemoryDocumentStore,
    failing_sets: Mutex<HashSet<String>>,
    fail_deletes: AtomicBool,
    fail_queries: AtomicBool,
    pub sets: AtomicUsize,
}

impl FlakyDocumentStore {
    pub fn fail_sets_in(&self, collection: &str) {
        self.failing_sets.lock().unwrap().insert(collection.to_string());
    }

    pub fn heal(&self) {
        self.failing_sets.lock().unwrap().clear();
        self.fail_deletes.store(false, Ordering::SeqCst);
        self.fail_queries.store(false, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

fn unavailable() -> DocumentError {
    DocumentError::Unavailable("injected failure".into())
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        self.inner.get(collection, id).await
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), DocumentError> {
        if self.failing_sets.lock().unwrap().contains(collection) {
            return Err(unavailable());
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(collection, id, fields, mode).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.query(collection, query).await
    }
}

/// Blob store whose uploads can be made to fail.
pub struct FlakyBlobStore {
    pub inner: MemoryBlobStore,
    fail_puts: AtomicBool,
}

impl FlakyBlobStore {
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }
}

impl Default for FlakyBlobStore {
    fn default() -> Self {
        Self {
            inner: MemoryBlobStore::new("test-bucket"),
            fail_puts: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, path: &ObjectPath, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("injected failure")));
        }
        self.inner.put(path, data).await
    }

    async fn get(&self, path: &ObjectPath) -> Result<Vec<u8>, StorageError> {
        self.inner.get(path).await
    }

    async fn download_url(&self, path: &ObjectPath) -> Result<String, StorageError> {
        self.inner.download_url(path).await
    }
}

/// A board over in-memory backends, with handles on each backend.
pub struct TestBoard {
    pub board: JobBoard,
    pub docs: Arc<FlakyDocumentStore>,
    pub blobs: Arc<FlakyBlobStore>,
    pub identity: Arc<LocalIdentityProvider>,
    pub local_storage: Arc<LocalStorage>,
}

impl TestBoard {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(AppConfig::default()).await
    }

    pub async fn spawn_with_config(config: AppConfig) -> Self {
        let docs = Arc::new(FlakyDocumentStore::default());
        let blobs = Arc::new(FlakyBlobStore::default());
        let identity = Arc::new(LocalIdentityProvider::in_memory());
        let local_storage = Arc::new(LocalStorage::in_memory());

        let backends = Backends {
            documents: docs.clone(),
            blobs: blobs.clone(),
            identity: identity.clone(),
            local_storage: local_storage.clone(),
        };
        let board = JobBoard::new(config, backends)
            .await
            .expect("Failed to build test board");

        Self {
            board,
            docs,
            blobs,
            identity,
            local_storage,
        }
    }

    pub fn collections(&self) -> &jobboard_common::config::CollectionsConfig {
        self.board.documents.collections()
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.docs.inner.count(collection).await
    }

    /// Register a user and return its uid.
    pub async fn register_user(&self, email: &str) -> String {
        let result = self.board.identity.register_user(&user_registration(email)).await;
        assert!(result.is_success(), "User registration failed: {result:?}");
        self.board.identity.current_user().expect("signed in").uid
    }

    /// Register a firm and return its uid.
    pub async fn register_firm(&self, email: &str, company: &str) -> String {
        let result = self
            .board
            .identity
            .register_firm(&firm_registration(email, company))
            .await;
        assert!(result.is_success(), "Firm registration failed: {result:?}");
        self.board.identity.current_user().expect("signed in").uid
    }

    /// Create a job ad and return its id.
    pub async fn create_job(&self, firm_id: &str, title: &str) -> String {
        let before: HashSet<String> = self.job_ids().await;
        let result = self.board.documents.create_job(job_form(title), firm_id).await;
        assert!(result.is_success(), "Job creation failed: {result:?}");
        self.job_ids()
            .await
            .into_iter()
            .find(|id| !before.contains(id))
            .expect("new job id")
    }

    async fn job_ids(&self) -> HashSet<String> {
        self.docs
            .inner
            .query(&self.collections().jobs, &Query::new())
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect()
    }

    /// Submit an application with a CV and return its id.
    pub async fn apply(&self, applicant_id: &str, firm_id: &str, job_id: &str) -> String {
        let result = self
            .board
            .documents
            .submit_application(application_form(applicant_id, firm_id, job_id, Some(cv_file())))
            .await;
        assert!(result.is_success(), "Application failed: {result:?}");
        let docs = self
            .docs
            .inner
            .query(
                &self.collections().applications,
                &Query::new()
                    .where_eq("applicant_id", applicant_id)
                    .where_eq("job_id", job_id),
            )
            .await
            .unwrap();
        docs.last().expect("stored application").id.clone()
    }
}

pub fn user_registration(email: &str) -> UserRegistration {
    UserRegistration {
        name: "Ana Popescu".into(),
        email: email.into(),
        telephone: "0712345678".into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
    }
}

pub fn firm_registration(email: &str, company: &str) -> FirmRegistration {
    FirmRegistration {
        company_name: company.into(),
        representative_name: "Ion Ionescu".into(),
        email: email.into(),
        tax_id: "12345678".into(),
        telephone: "0212345678".into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
    }
}

pub fn job_form(title: &str) -> JobForm {
    JobForm {
        title: title.into(),
        description: "Build and maintain backend services.".into(),
        position: Position::Junior,
        location: "Bucharest".into(),
        is_remote: false,
        required_experience: "1-2 years".into(),
        skills: JobSkills {
            programming_languages: vec!["Rust".into(), " Go ".into(), "Rust".into()],
            frameworks: vec![],
            certifications: vec![],
            tools: vec!["Docker".into()],
        },
    }
}

pub fn cv_file() -> FileUpload {
    FileUpload::new("cv.pdf", b"%PDF-1.7 test cv".to_vec()).with_content_type("application/pdf")
}

pub fn application_form(
    applicant_id: &str,
    firm_id: &str,
    job_id: &str,
    cv: Option<FileUpload>,
) -> ApplicationForm {
    ApplicationForm {
        applicant_id: applicant_id.into(),
        firm_id: firm_id.into(),
        job_id: job_id.into(),
        name: "Ana Popescu".into(),
        email: "ana@example.com".into(),
        telephone: "0712345678".into(),
        experience: 2.0,
        suitability: "I like Rust.".into(),
        cv,
        applicant_profile_pic: None,
        analysis_score: Some(81.5),
    }
}
