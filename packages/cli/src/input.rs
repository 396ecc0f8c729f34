use std::path::Path;

use anyhow::Context;
use jobboard_common::models::{FileUpload, JobForm, JobSkills};

use crate::JobArgs;

/// Read a file from disk into an upload, guessing its content type.
pub async fn read_upload(path: &Path) -> anyhow::Result<FileUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;

    let upload = FileUpload::new(file_name, bytes);
    Ok(match mime_guess::from_path(path).first() {
        Some(mime) => upload.with_content_type(mime.essence_str()),
        None => upload,
    })
}

pub async fn read_optional_upload(path: Option<&Path>) -> anyhow::Result<Option<FileUpload>> {
    match path {
        Some(path) => Ok(Some(read_upload(path).await?)),
        None => Ok(None),
    }
}

impl From<JobArgs> for JobForm {
    fn from(args: JobArgs) -> Self {
        JobForm {
            title: args.title,
            description: args.description,
            position: args.position.unwrap_or_default(),
            location: args.location,
            is_remote: args.remote,
            required_experience: args.experience,
            skills: JobSkills {
                programming_languages: args.languages,
                frameworks: args.frameworks,
                certifications: args.certifications,
                tools: args.tools,
            },
        }
    }
}
