use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use jobboard_common::ReturnType;
use jobboard_common::document::{Direction, Document, DocumentError, Query, WriteMode, encode};
use jobboard_common::models::{
    ApplicationForm, ApplicationStatus, JobApplication, UserJobApplication, timestamp,
};
use tracing::{error, info, instrument, warn};

use crate::documents::{DocumentClient, decode_with_id, str_field};

/// Title shown for applications whose job ad no longer exists.
pub const UNKNOWN_JOB: &str = "Unknown Job";
/// Name shown for applications whose firm no longer exists.
pub const UNKNOWN_FIRM: &str = "Unknown Firm";

/// One page of an applicant's applications.
#[derive(Clone, Debug, Default)]
pub struct ApplicationPage {
    pub applications: Vec<UserJobApplication>,
    /// Pass back to fetch the next page; `None` once the list is exhausted.
    pub cursor: Option<Document>,
}

impl DocumentClient {
    /// Upload the CV and store the application with status `Sent`.
    ///
    /// Without a CV nothing is written and `ApplicationCvRequired` is
    /// returned. A failed upload or write yields `JobApplicationFailed`.
    #[instrument(skip(self, form), fields(applicant_id = %form.applicant_id, job_id = %form.job_id))]
    pub async fn submit_application(&self, form: ApplicationForm) -> ReturnType {
        let Some(cv) = &form.cv else {
            return ReturnType::ApplicationCvRequired;
        };

        let id = self.store.generate_id(&self.collections.applications);
        let Some(cv_url) = self.uploads.upload_file(cv, &id, &self.cv_folder).await else {
            error!("CV upload failed, application not saved");
            return ReturnType::JobApplicationFailed;
        };

        let application = JobApplication {
            id,
            applicant_id: form.applicant_id,
            firm_id: form.firm_id,
            job_id: form.job_id,
            name: form.name,
            email: form.email,
            telephone: form.telephone,
            experience: form.experience,
            suitability: form.suitability,
            cv: cv_url,
            applicant_profile_pic: form.applicant_profile_pic.unwrap_or_default(),
            analysis_score: form.analysis_score,
            status: ApplicationStatus::Sent,
            created_at: timestamp::now(),
        };

        let result = match encode(&application) {
            Ok(fields) => {
                self.store
                    .set(
                        &self.collections.applications,
                        &application.id,
                        fields,
                        WriteMode::Overwrite,
                    )
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!(application_id = %application.id, "Application saved");
                ReturnType::Success
            }
            Err(e) => {
                error!(error = %e, "Error saving job application");
                ReturnType::JobApplicationFailed
            }
        }
    }

    /// Submission date of the applicant's application to `job_id`, if any.
    #[instrument(skip(self))]
    pub async fn is_application_sent(&self, applicant_id: &str, job_id: &str) -> Option<DateTime<Utc>> {
        let query = Query::new()
            .where_eq("applicant_id", applicant_id)
            .where_eq("job_id", job_id)
            .order_by("created_at", Direction::Ascending)
            .limit(1);
        let docs = match self.store.query(&self.collections.applications, &query).await {
            Ok(docs) => docs,
            Err(e) => {
                error!(error = %e, "Check for application failed");
                return None;
            }
        };

        let doc = docs.first()?;
        match DateTime::parse_from_rfc3339(&str_field(doc, "created_at")) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                warn!(application_id = %doc.id, error = %e, "Application has no valid creation date");
                None
            }
        }
    }

    /// Mark an application as seen by the firm. Missing applications and
    /// store errors are logged and otherwise ignored.
    #[instrument(skip(self))]
    pub async fn mark_application_seen(&self, id: &str) {
        let collection = &self.collections.applications;
        let result = async {
            let Some(doc) = self.store.get(collection, id).await? else {
                return Ok(false);
            };
            let mut fields = doc.fields;
            fields.insert("status".into(), ApplicationStatus::Seen.as_str().into());
            self.store
                .set(collection, id, fields, WriteMode::Merge)
                .await
                .map(|()| true)
        }
        .await;

        match result {
            Ok(true) => info!("Application marked as seen"),
            Ok(false) => error!("Application not found"),
            Err(e) => error!(error = %e, "Error updating application status"),
        }
    }

    /// One page of an applicant's applications, newest first, with the job
    /// title and firm name joined in.
    #[instrument(skip(self, cursor))]
    pub async fn get_user_applications(
        &self,
        applicant_id: &str,
        page_size: usize,
        cursor: Option<Document>,
    ) -> ApplicationPage {
        let result = async {
            let query = Query::new()
                .where_eq("applicant_id", applicant_id)
                .order_by("created_at", Direction::Descending);
            let (docs, cursor) = self
                .fetch_page(&self.collections.applications, query, page_size, cursor)
                .await?;
            let applications = try_join_all(docs.iter().map(|doc| self.summarize_application(doc))).await?;
            Ok::<_, DocumentError>(ApplicationPage { applications, cursor })
        }
        .await;
        result.unwrap_or_else(|e| {
            error!(error = %e, "Error fetching user job applications");
            ApplicationPage::default()
        })
    }

    async fn summarize_application(&self, doc: &Document) -> Result<UserJobApplication, DocumentError> {
        let application: JobApplication = decode_with_id(doc)?;
        let (job, firm) = futures::try_join!(
            self.store.get(&self.collections.jobs, &application.job_id),
            self.store.get(&self.collections.firms, &application.firm_id),
        )?;

        Ok(UserJobApplication {
            id: doc.id.clone(),
            job_title: job.map_or_else(|| UNKNOWN_JOB.to_string(), |job| str_field(&job, "title")),
            firm_name: firm.map_or_else(
                || UNKNOWN_FIRM.to_string(),
                |firm| str_field(&firm, "company_name"),
            ),
            created_at: application.created_at,
            status: application.status,
        })
    }

    /// Every application to a job, newest first.
    #[instrument(skip(self))]
    pub async fn get_applications_for_job(&self, job_id: &str) -> Option<Vec<JobApplication>> {
        let query = Query::new()
            .where_eq("job_id", job_id)
            .order_by("created_at", Direction::Descending);
        let result = async {
            let docs = self.store.query(&self.collections.applications, &query).await?;
            docs.iter()
                .map(decode_with_id::<JobApplication>)
                .collect::<Result<Vec<_>, DocumentError>>()
        }
        .await;
        result
            .inspect_err(|e| error!(error = %e, "Error fetching job applications"))
            .ok()
    }
}
