mod account;
mod application;
mod job;
mod skill;

pub mod timestamp;

pub use account::{
    AccountDocument, FirmAccount, FirmProfileUpdate, FirmRegistration, UserAccount,
    UserProfileUpdate, UserRegistration,
};
pub use application::{ApplicationForm, ApplicationStatus, JobApplication, UserJobApplication};
pub use job::{ANY_TAG, FirmSummary, Job, JobForm, JobSkills, JobWithFirm, Position, normalize_tags};
pub use skill::{Skill, SkillCategory};

/// A file picked by the user (CV or profile picture).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lower-cased extension of the original file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}
