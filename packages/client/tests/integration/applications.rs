use chrono::Utc;
use jobboard::{ReturnType, UNKNOWN_FIRM, UNKNOWN_JOB};
use jobboard_common::models::ApplicationStatus;

use crate::common::{TestBoard, application_form, cv_file};

mod submit {
    use super::*;

    #[tokio::test]
    async fn application_without_cv_writes_nothing() {
        let app = TestBoard::spawn().await;
        let job = app.create_job("firm-1", "Backend Engineer").await;
        let writes_before = app.docs.set_count();

        let result = app
            .board
            .documents
            .submit_application(application_form("applicant-1", "firm-1", &job, None))
            .await;

        assert_eq!(result, ReturnType::ApplicationCvRequired);
        assert_eq!(app.docs.set_count(), writes_before);
        assert_eq!(app.count(&app.collections().applications).await, 0);
        assert!(app.blobs.inner.is_empty().await);
    }

    #[tokio::test]
    async fn application_is_stored_as_sent_with_the_cv_url() {
        let app = TestBoard::spawn().await;
        let job = app.create_job("firm-1", "Backend Engineer").await;

        let id = app.apply("applicant-1", "firm-1", &job).await;

        let applications = app.board.documents.get_applications_for_job(&job).await.unwrap();
        assert_eq!(applications.len(), 1);
        let application = &applications[0];
        assert_eq!(application.id, id);
        assert_eq!(application.status, ApplicationStatus::Sent);
        assert_eq!(application.analysis_score, Some(81.5));
        assert!(
            application
                .cv
                .starts_with(&format!("memory://test-bucket/job_applications/{id}_")),
            "unexpected CV url {}",
            application.cv
        );
        assert!(application.cv.ends_with(".pdf"));

        let paths = app.blobs.inner.paths().await;
        assert_eq!(paths.len(), 1);
    }

    #[tokio::test]
    async fn failed_upload_is_reported_and_nothing_is_stored() {
        let app = TestBoard::spawn().await;
        let job = app.create_job("firm-1", "Backend Engineer").await;
        app.blobs.fail_puts();

        let result = app
            .board
            .documents
            .submit_application(application_form("applicant-1", "firm-1", &job, Some(cv_file())))
            .await;

        assert_eq!(result, ReturnType::JobApplicationFailed);
        assert_eq!(app.count(&app.collections().applications).await, 0);
    }

    #[tokio::test]
    async fn failed_write_is_reported() {
        let app = TestBoard::spawn().await;
        app.docs.fail_sets_in(&app.collections().applications);

        let result = app
            .board
            .documents
            .submit_application(application_form("applicant-1", "firm-1", "job-1", Some(cv_file())))
            .await;

        assert_eq!(result, ReturnType::JobApplicationFailed);
    }
}

mod sent_check {
    use super::*;

    #[tokio::test]
    async fn reports_the_submission_date_once_applied() {
        let app = TestBoard::spawn().await;
        let job = app.create_job("firm-1", "Backend Engineer").await;

        assert!(
            app.board
                .documents
                .is_application_sent("applicant-1", &job)
                .await
                .is_none()
        );

        let before = Utc::now();
        app.apply("applicant-1", "firm-1", &job).await;
        let sent = app
            .board
            .documents
            .is_application_sent("applicant-1", &job)
            .await
            .expect("application date");

        assert!(sent >= before - chrono::Duration::seconds(1));
        assert!(sent <= Utc::now());
        assert!(
            app.board
                .documents
                .is_application_sent("applicant-2", &job)
                .await
                .is_none()
        );
    }
}

mod status {
    use super::*;

    #[tokio::test]
    async fn opening_an_application_marks_it_seen() {
        let app = TestBoard::spawn().await;
        let job = app.create_job("firm-1", "Backend Engineer").await;
        let id = app.apply("applicant-1", "firm-1", &job).await;

        app.board.documents.mark_application_seen(&id).await;
        app.board.documents.mark_application_seen(&id).await;

        let applications = app.board.documents.get_applications_for_job(&job).await.unwrap();
        assert_eq!(applications[0].status, ApplicationStatus::Seen);
        assert_eq!(applications[0].name, "Ana Popescu");
    }

    #[tokio::test]
    async fn missing_application_is_not_created() {
        let app = TestBoard::spawn().await;

        app.board.documents.mark_application_seen("missing").await;

        assert_eq!(app.count(&app.collections().applications).await, 0);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn applicant_sees_job_titles_and_firm_names() {
        let app = TestBoard::spawn().await;
        let firm = app.register_firm("hr@acme.example", "Acme Software").await;
        let job = app.create_job(&firm, "Backend Engineer").await;
        app.apply("applicant-1", &firm, &job).await;

        let page = app
            .board
            .documents
            .get_user_applications("applicant-1", 10, None)
            .await;

        assert!(page.cursor.is_none());
        assert_eq!(page.applications.len(), 1);
        let row = &page.applications[0];
        assert_eq!(row.job_title, "Backend Engineer");
        assert_eq!(row.firm_name, "Acme Software");
        assert_eq!(row.status, ApplicationStatus::Sent);
    }

    #[tokio::test]
    async fn deleted_job_and_firm_use_placeholders() {
        let app = TestBoard::spawn().await;
        app.apply("applicant-1", "gone-firm", "gone-job").await;

        let page = app
            .board
            .documents
            .get_user_applications("applicant-1", 10, None)
            .await;

        assert_eq!(page.applications[0].job_title, UNKNOWN_JOB);
        assert_eq!(page.applications[0].firm_name, UNKNOWN_FIRM);
    }

    #[tokio::test]
    async fn applications_paginate_newest_first() {
        let app = TestBoard::spawn().await;
        for n in 0..5 {
            let job = app.create_job("firm-1", &format!("Job {n}")).await;
            app.apply("applicant-1", "firm-1", &job).await;
        }
        app.apply("applicant-2", "firm-1", "other-job").await;

        let first = app
            .board
            .documents
            .get_user_applications("applicant-1", 3, None)
            .await;
        assert_eq!(first.applications.len(), 3);
        let second = app
            .board
            .documents
            .get_user_applications("applicant-1", 3, first.cursor.clone())
            .await;
        assert_eq!(second.applications.len(), 2);
        assert!(second.cursor.is_none());

        let rows: Vec<_> = first
            .applications
            .iter()
            .chain(second.applications.iter())
            .collect();
        assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        let mut ids: Vec<_> = rows.iter().map(|row| row.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
