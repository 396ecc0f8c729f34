//! Client data layer of the job board: identity, profile and job documents,
//! applications with CV uploads, the skill catalogue, CV scoring and the
//! view-state stores built on top of them.

pub mod auth;
pub mod board;
pub mod cv_analysis;
pub mod documents;
pub mod error;
pub mod local_storage;
pub mod session;
pub mod stores;
pub mod uploads;

mod accounts;
mod applications;
mod jobs;
mod skills;

pub use applications::{ApplicationPage, UNKNOWN_FIRM, UNKNOWN_JOB};
pub use auth::IdentityClient;
pub use board::{Backends, JobBoard};
pub use cv_analysis::{CvAnalysis, CvAnalysisClient, CvAnalysisError};
pub use documents::DocumentClient;
pub use error::ClientError;
pub use jobboard_common::ReturnType;
pub use jobs::JobPage;
pub use local_storage::{LOGGED_IN_KEY, LocalStorage};
pub use session::Session;
pub use skills::SkillImport;
pub use stores::{JobFilterStore, JobState, JobStore, UserState, UserStore};
pub use uploads::StorageClient;
