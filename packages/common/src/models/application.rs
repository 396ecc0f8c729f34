use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FileUpload, timestamp};

/// Review state of an application. Only ever advances `Sent -> Seen`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Sent,
    Seen,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "Sent",
            Self::Seen => "Seen",
        }
    }

    /// Status after the firm opens the application.
    pub fn seen(self) -> Self {
        Self::Seen
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form submitted by an applicant. The CV travels as raw bytes and is
/// uploaded before the application document is written.
#[derive(Clone, Debug, Default)]
pub struct ApplicationForm {
    pub applicant_id: String,
    pub firm_id: String,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub telephone: String,
    pub experience: f64,
    pub suitability: String,
    pub cv: Option<FileUpload>,
    pub applicant_profile_pic: Option<String>,
    pub analysis_score: Option<f64>,
}

/// A stored job application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: String,
    pub applicant_id: String,
    pub firm_id: String,
    pub job_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub experience: f64,
    #[serde(default)]
    pub suitability: String,
    /// Download URL of the uploaded CV.
    pub cv: String,
    #[serde(default)]
    pub applicant_profile_pic: String,
    #[serde(default)]
    pub analysis_score: Option<f64>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Row of an applicant's "my applications" list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserJobApplication {
    pub id: String,
    pub job_title: String,
    pub firm_name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}
