mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use jobboard::JobBoard;
use jobboard_common::config::AppConfig;
use jobboard_common::models::{Position, SkillCategory};
use tracing::Level;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board accounts, job ads, applications and skills from the command line")]
struct Cli {
    /// Config file (defaults to config/config.toml or $JOBBOARD_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the session state when the config names none
    #[arg(long, global = true, default_value = "./data")]
    data_dir: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[command(subcommand)]
        command: RegisterCommands,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with an assertion from an external provider
    LoginFederated {
        #[arg(long, default_value = "google.com")]
        provider: String,
        /// Account id at the provider
        #[arg(long)]
        subject: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        photo_url: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Edit the signed-in account's profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage job ads
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Apply to a job ad
    Apply {
        job_id: String,
        /// CV file to upload
        #[arg(long)]
        cv: Option<PathBuf>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        telephone: String,
        /// Years of experience
        #[arg(long, default_value_t = 0.0)]
        experience: f64,
        /// Why you are a good fit
        #[arg(long, default_value = "")]
        suitability: String,
        /// Score the CV against the job before applying
        #[arg(long)]
        analyze: bool,
    },

    /// Inspect applications
    Application {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Score a CV against a job ad
    Analyze {
        job_id: String,
        #[arg(long)]
        cv: PathBuf,
    },

    /// Browse and import the skill catalogue
    Skills {
        #[command(subcommand)]
        command: SkillCommands,
    },
}

#[derive(Subcommand)]
enum RegisterCommands {
    /// Register an applicant
    User {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        telephone: String,
        #[arg(long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Register a firm
    Firm {
        #[arg(long)]
        company: String,
        #[arg(long)]
        representative: String,
        #[arg(long)]
        email: String,
        /// Fiscal code (CUI)
        #[arg(long)]
        tax_id: String,
        #[arg(long)]
        telephone: String,
        #[arg(long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Update an applicant profile
    User {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        telephone: String,
        #[arg(long)]
        picture: Option<PathBuf>,
    },

    /// Update a firm profile
    Firm {
        #[arg(long)]
        company: String,
        #[arg(long)]
        representative: String,
        #[arg(long)]
        tax_id: String,
        #[arg(long)]
        telephone: String,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
}

#[derive(Args)]
struct JobArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Intern, Junior, Middle or Senior
    #[arg(long)]
    position: Option<Position>,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long)]
    remote: bool,
    /// e.g. "2 years" or "1-3 years"
    #[arg(long, default_value = "")]
    experience: String,
    #[arg(long, value_delimiter = ',')]
    languages: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    frameworks: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    certifications: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    tools: Vec<String>,
}

#[derive(Subcommand)]
enum JobCommands {
    /// Post a job ad as the signed-in firm
    Create(JobArgs),

    /// Replace the editable fields of a job ad
    Edit {
        id: String,
        #[command(flatten)]
        job: JobArgs,
    },

    /// Show a job ad with its firm
    Show { id: String },

    /// List job ads, newest first
    List {
        #[arg(long)]
        page_size: Option<usize>,
        /// Number of pages to fetch (all when omitted)
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Job ads of the signed-in firm
    Mine,

    /// Delete a job ad and its applications
    Delete { id: String },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// When the signed-in user applied to a job, if ever
    Sent { job_id: String },

    /// Applications of the signed-in user
    List {
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Applications to a job ad
    ForJob { job_id: String },

    /// Mark an application as seen
    Seen { id: String },
}

#[derive(Subcommand)]
enum SkillCommands {
    /// Skills of a category starting with a prefix
    Search {
        category: SkillCategory,
        #[arg(default_value = "")]
        term: String,
    },

    /// Every skill of a category
    List { category: SkillCategory },

    /// Import a JSON array of {"name", "category"} objects
    Import { file: PathBuf },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load config")?;

    // Keep the session between invocations.
    if config.identity.state_file.is_none() {
        config.identity.state_file = Some(cli.data_dir.join("identity.json"));
    }
    if config.session.local_storage_file.is_none() {
        config.session.local_storage_file = Some(cli.data_dir.join("local_storage.json"));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level(cli.verbose))
        .init();

    let config = load_config(&cli)?;
    let board = JobBoard::open(config)
        .await
        .context("Failed to open job board backends")?;

    commands::run(&board, cli.command).await
}
