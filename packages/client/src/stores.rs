//! View-state stores shared between screens.
//!
//! Each store publishes its state on a `watch` channel so views can react to
//! changes. [`UserStore`] and [`JobStore`] mirror their state into
//! [`LocalStorage`] and restore it on load.

use std::sync::Arc;

use jobboard_common::models::{AccountDocument, Job, JobWithFirm};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{error, warn};

use crate::documents::DocumentClient;
use crate::local_storage::LocalStorage;

pub const USER_STORE_KEY: &str = "user";
pub const JOB_STORE_KEY: &str = "job";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub user_info: Option<AccountDocument>,
    pub is_authenticated: bool,
    pub is_firm: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub jobs: Vec<Job>,
}

async fn restore<T: DeserializeOwned + Default>(storage: &LocalStorage, key: &str) -> T {
    let Some(raw) = storage.get_item(key).await else {
        return T::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Discarding unreadable stored state");
        T::default()
    })
}

async fn save<T: Serialize>(storage: &LocalStorage, key: &str, state: &T) {
    let result = match serde_json::to_string(state) {
        Ok(raw) => storage.set_item(key, raw).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        error!(key, error = %e, "Failed to persist store");
    }
}

/// The signed-in account as shown by the views.
pub struct UserStore {
    storage: Arc<LocalStorage>,
    state: watch::Sender<UserState>,
}

impl UserStore {
    pub async fn load(storage: Arc<LocalStorage>) -> Self {
        let state = restore(&storage, USER_STORE_KEY).await;
        Self {
            storage,
            state: watch::Sender::new(state),
        }
    }

    pub async fn set_user(&self, account: AccountDocument) {
        let state = UserState {
            is_firm: account.is_firm(),
            is_authenticated: true,
            user_info: Some(account),
        };
        save(&self.storage, USER_STORE_KEY, &state).await;
        self.state.send_replace(state);
    }

    pub async fn clear_user(&self) {
        let state = UserState::default();
        save(&self.storage, USER_STORE_KEY, &state).await;
        self.state.send_replace(state);
    }

    pub fn state(&self) -> UserState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }
}

/// Job ads of the signed-in firm.
pub struct JobStore {
    storage: Arc<LocalStorage>,
    state: watch::Sender<JobState>,
}

impl JobStore {
    pub async fn load(storage: Arc<LocalStorage>) -> Self {
        let state = restore(&storage, JOB_STORE_KEY).await;
        Self {
            storage,
            state: watch::Sender::new(state),
        }
    }

    /// Replace the list with the firm's current jobs; a failed fetch leaves
    /// it empty.
    pub async fn load_jobs(&self, documents: &DocumentClient, firm_id: &str) {
        let jobs = documents.get_jobs_of_firm(firm_id).await.unwrap_or_default();
        let state = JobState { jobs };
        save(&self.storage, JOB_STORE_KEY, &state).await;
        self.state.send_replace(state);
    }

    /// Refresh after the firm posted a job.
    pub async fn add_job(&self, documents: &DocumentClient, firm_id: &str) {
        self.load_jobs(documents, firm_id).await;
    }

    pub async fn clear_jobs(&self) {
        let state = JobState::default();
        save(&self.storage, JOB_STORE_KEY, &state).await;
        self.state.send_replace(state);
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.borrow().jobs.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }
}

/// Result of the latest job search. Not persisted.
pub struct JobFilterStore {
    jobs: watch::Sender<Vec<JobWithFirm>>,
}

impl Default for JobFilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobFilterStore {
    pub fn new() -> Self {
        Self {
            jobs: watch::Sender::new(Vec::new()),
        }
    }

    pub fn set_jobs(&self, jobs: Vec<JobWithFirm>) {
        self.jobs.send_replace(jobs);
    }

    pub fn jobs(&self) -> Vec<JobWithFirm> {
        self.jobs.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<JobWithFirm>> {
        self.jobs.subscribe()
    }
}
