use futures::future::try_join_all;
use jobboard_common::ReturnType;
use jobboard_common::document::{Direction, Document, DocumentError, Query, WriteMode, encode};
use jobboard_common::models::{FirmSummary, Job, JobForm, JobWithFirm, timestamp};
use tracing::{error, info, instrument};

use crate::documents::{DocumentClient, decode_with_id, str_field};
use crate::error::ClientError;

/// One page of the public job list.
#[derive(Clone, Debug, Default)]
pub struct JobPage {
    pub jobs: Vec<JobWithFirm>,
    /// Pass back to fetch the next page; `None` once the list is exhausted.
    pub cursor: Option<Document>,
}

fn normalized(form: JobForm) -> JobForm {
    JobForm {
        skills: form.skills.normalized(),
        ..form
    }
}

impl DocumentClient {
    /// Store a new job ad for `firm_id` under a generated id.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_job(&self, form: JobForm, firm_id: &str) -> ReturnType {
        let job = Job {
            id: self.store.generate_id(&self.collections.jobs),
            firm_id: firm_id.to_string(),
            form: normalized(form),
            created_at: timestamp::now(),
        };
        let result = match encode(&job) {
            Ok(fields) => {
                self.store
                    .set(&self.collections.jobs, &job.id, fields, WriteMode::Overwrite)
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!(job_id = %job.id, "Job created");
                ReturnType::Success
            }
            Err(e) => {
                error!(error = %e, "Error adding job");
                ReturnType::JobAddFailed
            }
        }
    }

    /// All job ads of a firm, newest first.
    #[instrument(skip(self))]
    pub async fn get_jobs_of_firm(&self, firm_id: &str) -> Option<Vec<Job>> {
        let query = Query::new()
            .where_eq("firm_id", firm_id)
            .order_by("created_at", Direction::Descending);
        let result = async {
            let docs = self.store.query(&self.collections.jobs, &query).await?;
            docs.iter()
                .map(decode_with_id::<Job>)
                .collect::<Result<Vec<_>, DocumentError>>()
        }
        .await;
        result
            .inspect_err(|e| error!(error = %e, "Error fetching firm jobs"))
            .ok()
    }

    /// Editable fields of a job ad; missing fields come back empty.
    #[instrument(skip(self))]
    pub async fn get_job_by_id(&self, id: &str) -> Option<JobForm> {
        let result = async {
            match self.store.get(&self.collections.jobs, id).await? {
                Some(doc) => doc.decode::<JobForm>().map(Some),
                None => Ok(None),
            }
        }
        .await;
        result
            .inspect_err(|e| error!(error = %e, "Error fetching job"))
            .ok()
            .flatten()
    }

    /// A job ad joined with its firm's display fields.
    #[instrument(skip(self))]
    pub async fn get_job_with_firm(&self, id: &str) -> Option<JobWithFirm> {
        let result = async {
            let Some(doc) = self.store.get(&self.collections.jobs, id).await? else {
                return Ok(None);
            };
            self.join_firm(&doc).await.map(Some)
        }
        .await;
        result
            .inspect_err(|e| error!(error = %e, "Error fetching job with firm"))
            .ok()
            .flatten()
    }

    /// Merge the editable fields into an existing job ad.
    #[instrument(skip(self, form))]
    pub async fn edit_job(&self, id: &str, form: JobForm) -> ReturnType {
        let result = match encode(&normalized(form)) {
            Ok(fields) => {
                self.store
                    .set(&self.collections.jobs, id, fields, WriteMode::Merge)
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => ReturnType::Success,
            Err(e) => {
                error!(error = %e, "Error editing job");
                ReturnType::JobEditFailed
            }
        }
    }

    /// Delete a job ad together with every application to it. Applications
    /// are deleted concurrently before the job; the first failure aborts.
    #[instrument(skip(self))]
    pub async fn delete_job_by_id(&self, id: &str) -> Result<(), ClientError> {
        let result = self.delete_job_cascade(id).await;
        if let Err(e) = &result {
            error!(error = %e, "Error deleting job and its applications");
        }
        result.map_err(ClientError::from)
    }

    async fn delete_job_cascade(&self, id: &str) -> Result<(), DocumentError> {
        let applications_collection = &self.collections.applications;
        let applications = self
            .store
            .query(applications_collection, &Query::new().where_eq("job_id", id))
            .await?;
        try_join_all(
            applications
                .iter()
                .map(|doc| self.store.delete(applications_collection, &doc.id)),
        )
        .await?;

        let jobs_collection = &self.collections.jobs;
        let mut job_ids: Vec<String> = self
            .store
            .query(jobs_collection, &Query::new().where_eq("id", id))
            .await?
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        if !job_ids.iter().any(|job_id| job_id == id) {
            job_ids.push(id.to_string());
        }
        try_join_all(job_ids.iter().map(|job_id| self.store.delete(jobs_collection, job_id))).await?;

        info!(applications = applications.len(), "Job and associated applications deleted");
        Ok(())
    }

    /// One page of all job ads, newest first, each joined with its firm.
    /// Errors yield an empty page with no cursor.
    #[instrument(skip(self, cursor), fields(after = cursor.as_ref().map(|doc| doc.id.as_str())))]
    pub async fn list_jobs(&self, page_size: usize, cursor: Option<Document>) -> JobPage {
        let result = async {
            let query = Query::new().order_by("created_at", Direction::Descending);
            let (docs, cursor) = self
                .fetch_page(&self.collections.jobs, query, page_size, cursor)
                .await?;
            let jobs = try_join_all(docs.iter().map(|doc| self.join_firm(doc))).await?;
            Ok::<_, DocumentError>(JobPage { jobs, cursor })
        }
        .await;
        result.unwrap_or_else(|e| {
            error!(error = %e, "Error fetching jobs with firm details");
            JobPage::default()
        })
    }

    async fn join_firm(&self, doc: &Document) -> Result<JobWithFirm, DocumentError> {
        let job: Job = decode_with_id(doc)?;
        let firm = self.firm_summary(&job.firm_id).await?;
        Ok(JobWithFirm { job, firm })
    }

    /// Display fields of a firm, with the default picture when the firm has
    /// none or no longer exists.
    pub(crate) async fn firm_summary(&self, firm_id: &str) -> Result<FirmSummary, DocumentError> {
        let firm = match firm_id {
            "" => None,
            id => self.store.get(&self.collections.firms, id).await?,
        };
        let Some(firm) = firm else {
            return Ok(FirmSummary {
                firm_profile_pic: self.default_profile_picture.clone(),
                ..FirmSummary::default()
            });
        };

        let picture = str_field(&firm, "profile_pic");
        Ok(FirmSummary {
            company_name: str_field(&firm, "company_name"),
            email: str_field(&firm, "email"),
            telephone: str_field(&firm, "telephone"),
            firm_profile_pic: if picture.is_empty() {
                self.default_profile_picture.clone()
            } else {
                picture
            },
        })
    }
}
