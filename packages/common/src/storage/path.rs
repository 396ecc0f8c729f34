use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// A validated, slash-separated object path inside the bucket
/// (for example `job_applications/abc123_1717171717171.pdf`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Parse and validate an object path.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StorageError::InvalidPath("path cannot be empty".into()));
        }
        if trimmed.starts_with('/') {
            return Err(StorageError::InvalidPath(format!(
                "'{trimmed}' must be relative"
            )));
        }
        for segment in trimmed.split('/') {
            validate_segment(segment)?;
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Join a folder and a file name into a path.
    pub fn join(folder: &str, name: &str) -> Result<Self, StorageError> {
        let folder = folder.trim().trim_matches('/');
        if folder.is_empty() {
            Self::parse(name)
        } else {
            Self::parse(&format!("{folder}/{name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Relative filesystem path for this object.
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

/// Validate a single path segment (also used for document collection and id
/// names by the filesystem document store).
pub fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty() {
        return Err(StorageError::InvalidPath("empty path segment".into()));
    }
    if segment == "." || segment == ".." {
        return Err(StorageError::InvalidPath(format!(
            "'{segment}' is not allowed"
        )));
    }
    if segment.starts_with('.') {
        return Err(StorageError::InvalidPath(format!(
            "hidden segment '{segment}' is not allowed"
        )));
    }
    // Control characters would end up in URLs and file names.
    if segment.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidPath(
            "control characters are not allowed".into(),
        ));
    }
    if segment.contains('\\') || segment.contains('/') {
        return Err(StorageError::InvalidPath(format!(
            "'{segment}' contains a path separator"
        )));
    }
    Ok(())
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}
