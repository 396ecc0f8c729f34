use std::sync::Arc;
use std::time::Duration;

use jobboard_common::config::CvAnalysisConfig;
use jobboard_common::identity::IdentityProvider;
use jobboard_common::models::{FileUpload, JobSkills};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, instrument};

const FALLBACK_MESSAGE: &str = "Failed to analyze CV";

#[derive(Debug, Error)]
pub enum CvAnalysisError {
    #[error("User is not authenticated")]
    NotAuthenticated,
    #[error("could not obtain id token: {0}")]
    Token(String),
    #[error("could not encode job requirements: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("request to analysis service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Result returned by the analysis service. Only `score` is interpreted;
/// everything else is passed through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CvAnalysis {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Client of the external CV scoring service.
#[derive(Clone)]
pub struct CvAnalysisClient {
    http: Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
}

impl CvAnalysisClient {
    pub fn new(
        config: &CvAnalysisConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, CvAnalysisError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity,
        })
    }

    /// Score a CV against a job's skill requirements, authenticated with a
    /// freshly issued id token of the current session.
    #[instrument(skip(self, cv, job_skills), fields(file = %cv.file_name))]
    pub async fn analyze(
        &self,
        cv: &FileUpload,
        job_skills: &JobSkills,
        required_experience: &str,
        job_title: &str,
    ) -> Result<CvAnalysis, CvAnalysisError> {
        let result = self
            .send(cv, job_skills, required_experience, job_title)
            .await;
        match &result {
            Ok(analysis) => info!(score = ?analysis.score, "CV analyzed"),
            Err(e) => error!(error = %e, "Error analyzing CV"),
        }
        result
    }

    async fn send(
        &self,
        cv: &FileUpload,
        job_skills: &JobSkills,
        required_experience: &str,
        job_title: &str,
    ) -> Result<CvAnalysis, CvAnalysisError> {
        if self.identity.current_user().is_none() {
            return Err(CvAnalysisError::NotAuthenticated);
        }
        let token = self
            .identity
            .id_token(true)
            .await
            .map_err(|e| CvAnalysisError::Token(e.to_string()))?;

        let mut file = Part::bytes(cv.bytes.clone()).file_name(cv.file_name.clone());
        if let Some(content_type) = &cv.content_type {
            file = file.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", file)
            .text("job_requirements", serde_json::to_string(job_skills)?)
            .text("job_required_experience", required_experience.to_string())
            .text("job_title", job_title.to_string());

        let res = self
            .http
            .post(format!("{}/upload_cv", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            return Err(CvAnalysisError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        Ok(res.json().await?)
    }
}

/// Message of an error envelope, falling back to a generic one.
fn rejection_message(body: &Value) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string()
}
