use anyhow::{Context, anyhow, bail};
use jobboard::{JobBoard, ReturnType};
use jobboard_common::document::Document;
use jobboard_common::identity::{AuthUser, FederatedCredential};
use jobboard_common::models::{
    AccountDocument, ApplicationForm, FirmProfileUpdate, FirmRegistration, JobForm,
    UserProfileUpdate, UserRegistration,
};
use jobboard_common::validation::{
    check_application, check_firm_profile, check_firm_registration, check_job_form, check_login,
    check_user_profile, check_user_registration,
};
use serde::Serialize;
use tracing::info;

use crate::input::{read_optional_upload, read_upload};
use crate::{
    ApplicationCommands, Commands, JobCommands, ProfileCommands, RegisterCommands, SkillCommands,
};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the outcome and turn anything but success into an error.
fn report(outcome: ReturnType) -> anyhow::Result<()> {
    outcome.into_result()?;
    println!("{}", outcome.message());
    Ok(())
}

fn require_user(board: &JobBoard) -> anyhow::Result<AuthUser> {
    board
        .identity
        .current_user()
        .ok_or_else(|| anyhow!(ReturnType::NotAuthenticated))
}

async fn require_account(board: &JobBoard) -> anyhow::Result<AccountDocument> {
    let user = require_user(board)?;
    board
        .documents
        .get_document_by_uid(&user.uid)
        .await
        .ok_or_else(|| anyhow!(ReturnType::UserNotFound))
}

/// Refresh the cached account after a sign-in or profile change.
async fn sync_user_store(board: &JobBoard) -> anyhow::Result<()> {
    let account = require_account(board).await?;
    if account.is_firm() {
        board.job_store.load_jobs(&board.documents, account.uid()).await;
    }
    board.user_store.set_user(account).await;
    Ok(())
}

pub async fn run(board: &JobBoard, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Register { command } => register(board, command).await,
        Commands::Login { email, password } => {
            check_login(&email, &password).into_result()?;
            report(board.identity.login_with_email(&email, &password).await)?;
            sync_user_store(board).await
        }
        Commands::LoginFederated {
            provider,
            subject,
            email,
            name,
            photo_url,
        } => {
            let credential = FederatedCredential {
                provider_id: provider,
                subject,
                email,
                display_name: name,
                photo_url,
            };
            report(board.identity.login_with_federated(&credential).await)?;
            let user = require_user(board)?;
            board
                .documents
                .ensure_user_document(&user)
                .await
                .context("Failed to create profile")?;
            sync_user_store(board).await
        }
        Commands::Logout => {
            board.identity.logout().await;
            board.user_store.clear_user().await;
            board.job_store.clear_jobs().await;
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => {
            let user = require_user(board)?;
            match board.documents.get_document_by_uid(&user.uid).await {
                Some(account) => print_json(&account),
                None => print_json(&user),
            }
        }
        Commands::Profile { command } => profile(board, command).await,
        Commands::Job { command } => job(board, command).await,
        Commands::Apply {
            job_id,
            cv,
            name,
            email,
            telephone,
            experience,
            suitability,
            analyze,
        } => {
            let mut form = ApplicationForm {
                name,
                email,
                telephone,
                experience,
                suitability,
                ..ApplicationForm::default()
            };
            check_application(&form).into_result()?;

            let user = require_user(board)?;
            let job = board
                .documents
                .get_job_with_firm(&job_id)
                .await
                .with_context(|| format!("Job {job_id} not found"))?;
            if board
                .documents
                .is_application_sent(&user.uid, &job_id)
                .await
                .is_some()
            {
                bail!("You already applied to this job");
            }

            let cv = read_optional_upload(cv.as_deref()).await?;
            let analysis_score = match (&cv, analyze) {
                (Some(file), true) => {
                    let posting = &job.job.form;
                    board
                        .cv_analysis
                        .analyze(
                            file,
                            &posting.skills,
                            &posting.required_experience,
                            &posting.title,
                        )
                        .await
                        .context("CV analysis failed")?
                        .score
                }
                _ => None,
            };
            let applicant_profile_pic = board
                .user_store
                .state()
                .user_info
                .map(|account| account.profile_pic().to_string());

            form.applicant_id = user.uid;
            form.firm_id = job.job.firm_id;
            form.job_id = job_id;
            form.cv = cv;
            form.applicant_profile_pic = applicant_profile_pic;
            form.analysis_score = analysis_score;
            report(board.documents.submit_application(form).await)
        }
        Commands::Application { command } => application(board, command).await,
        Commands::Analyze { job_id, cv } => {
            let job = board
                .documents
                .get_job_by_id(&job_id)
                .await
                .with_context(|| format!("Job {job_id} not found"))?;
            let file = read_upload(&cv).await?;
            let analysis = board
                .cv_analysis
                .analyze(&file, &job.skills, &job.required_experience, &job.title)
                .await?;
            print_json(&analysis)
        }
        Commands::Skills { command } => skills(board, command).await,
    }
}

async fn register(board: &JobBoard, command: RegisterCommands) -> anyhow::Result<()> {
    match command {
        RegisterCommands::User {
            name,
            email,
            telephone,
            password,
            confirm_password,
        } => {
            let form = UserRegistration {
                name,
                email,
                telephone,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            check_user_registration(&form).into_result()?;
            report(board.identity.register_user(&form).await)?;
        }
        RegisterCommands::Firm {
            company,
            representative,
            email,
            tax_id,
            telephone,
            password,
            confirm_password,
        } => {
            let form = FirmRegistration {
                company_name: company,
                representative_name: representative,
                email,
                tax_id,
                telephone,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            check_firm_registration(&form).into_result()?;
            report(board.identity.register_firm(&form).await)?;
        }
    }
    sync_user_store(board).await
}

async fn profile(board: &JobBoard, command: ProfileCommands) -> anyhow::Result<()> {
    let user = require_user(board)?;
    let outcome = match command {
        ProfileCommands::User {
            name,
            email,
            telephone,
            picture,
        } => {
            let mut update = UserProfileUpdate {
                email,
                telephone,
                name,
                profile_pic: None,
            };
            check_user_profile(&update).into_result()?;
            update.profile_pic = read_optional_upload(picture.as_deref()).await?;
            board.documents.edit_user_document(&user.uid, update).await
        }
        ProfileCommands::Firm {
            company,
            representative,
            tax_id,
            telephone,
            picture,
        } => {
            let mut update = FirmProfileUpdate {
                company_name: company,
                representative_name: representative,
                tax_id,
                telephone,
                profile_pic: None,
            };
            check_firm_profile(&update).into_result()?;
            update.profile_pic = read_optional_upload(picture.as_deref()).await?;
            board.documents.edit_firm_account(&user.uid, update).await
        }
    };
    report(outcome)?;
    sync_user_store(board).await
}

async fn job(board: &JobBoard, command: JobCommands) -> anyhow::Result<()> {
    match command {
        JobCommands::Create(args) => {
            let account = require_account(board).await?;
            if !account.is_firm() {
                bail!("Only firms can post job ads");
            }
            let form = JobForm::from(args);
            check_job_form(&form).into_result()?;
            report(board.documents.create_job(form, account.uid()).await)?;
            board.job_store.add_job(&board.documents, account.uid()).await;
            Ok(())
        }
        JobCommands::Edit { id, job } => {
            let form = JobForm::from(job);
            check_job_form(&form).into_result()?;
            report(board.documents.edit_job(&id, form).await)
        }
        JobCommands::Show { id } => {
            let job = board
                .documents
                .get_job_with_firm(&id)
                .await
                .with_context(|| format!("Job {id} not found"))?;
            print_json(&job)
        }
        JobCommands::List { page_size, pages } => {
            let page_size = page_size.unwrap_or_else(|| board.default_page_size());
            let mut jobs = Vec::new();
            let mut cursor: Option<Document> = None;
            for _ in 0..pages.unwrap_or(usize::MAX) {
                let page = board.documents.list_jobs(page_size, cursor).await;
                jobs.extend(page.jobs);
                cursor = page.cursor;
                if cursor.is_none() {
                    break;
                }
            }
            board.job_filter.set_jobs(jobs.clone());
            print_json(&jobs)
        }
        JobCommands::Mine => {
            let user = require_user(board)?;
            board.job_store.load_jobs(&board.documents, &user.uid).await;
            print_json(&board.job_store.jobs())
        }
        JobCommands::Delete { id } => {
            board
                .documents
                .delete_job_by_id(&id)
                .await
                .map_err(|e| anyhow!(e).context(ReturnType::JobDeleteFailed.message()))?;
            if let Some(user) = board.identity.current_user() {
                board.job_store.load_jobs(&board.documents, &user.uid).await;
            }
            info!(job_id = %id, "Job deleted");
            println!("Job {id} deleted");
            Ok(())
        }
    }
}

async fn application(board: &JobBoard, command: ApplicationCommands) -> anyhow::Result<()> {
    match command {
        ApplicationCommands::Sent { job_id } => {
            let user = require_user(board)?;
            match board.documents.is_application_sent(&user.uid, &job_id).await {
                Some(at) => println!("Applied on {}", at.to_rfc3339()),
                None => println!("Not applied"),
            }
            Ok(())
        }
        ApplicationCommands::List { page_size, pages } => {
            let user = require_user(board)?;
            let page_size = page_size.unwrap_or_else(|| board.default_page_size());
            let mut applications = Vec::new();
            let mut cursor: Option<Document> = None;
            for _ in 0..pages.unwrap_or(usize::MAX) {
                let page = board
                    .documents
                    .get_user_applications(&user.uid, page_size, cursor)
                    .await;
                applications.extend(page.applications);
                cursor = page.cursor;
                if cursor.is_none() {
                    break;
                }
            }
            print_json(&applications)
        }
        ApplicationCommands::ForJob { job_id } => {
            let applications = board
                .documents
                .get_applications_for_job(&job_id)
                .await
                .context("Failed to fetch applications")?;
            print_json(&applications)
        }
        ApplicationCommands::Seen { id } => {
            board.documents.mark_application_seen(&id).await;
            println!("Application {id} marked as seen");
            Ok(())
        }
    }
}

async fn skills(board: &JobBoard, command: SkillCommands) -> anyhow::Result<()> {
    match command {
        SkillCommands::Search { category, term } => {
            print_json(&board.documents.search_skills(&term, category).await)
        }
        SkillCommands::List { category } => {
            print_json(&board.documents.list_skills(category).await)
        }
        SkillCommands::Import { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = board.documents.import_skills(&json).await?;
            println!(
                "Imported {} skills ({} already present)",
                summary.added, summary.skipped
            );
            Ok(())
        }
    }
}
