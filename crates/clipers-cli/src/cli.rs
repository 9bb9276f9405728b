use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clipers_core::models::JobType;

use crate::config::StoreKind;

#[derive(Parser, Debug)]
#[command(name = "clipers", version, about = "Command-line client for the Clipers job and video platform")]
pub struct Args {
    /// Backend URL; `/api` is appended when missing
    #[arg(long, global = true, env = "CLIPERS_API_URL")]
    pub api_url: Option<String>,

    /// Where tokens are kept between runs
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Plain,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the token pair
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget stored tokens
    Logout,
    /// Show configuration and the signed-in user
    Status,
    /// Job postings and applications
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Short video clips
    Clipers {
        #[command(subcommand)]
        command: CliperCommands,
    },
    /// Posts and comments
    Feed {
        #[command(subcommand)]
        command: FeedCommands,
    },
    /// Your own profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Company profiles
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Search public job listings
    Search {
        /// Free-text search
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        location: Option<String>,
        /// full-time, part-time, contract or internship
        #[arg(long = "type")]
        job_type: Option<JobType>,
        #[arg(long)]
        salary_min: Option<u64>,
        #[arg(long)]
        salary_max: Option<u64>,
        /// Required skill; repeat for several
        #[arg(long = "skill")]
        skills: Vec<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show one job
    Show { id: String },
    /// Apply to a job
    Apply { id: String },
    /// Candidates matched to a job
    Matches { id: String },
    /// Applicants of a job
    Applicants {
        id: String,
        /// Use the backend's ranking
        #[arg(long)]
        ranked: bool,
    },
    /// Your applications
    Mine,
    /// Delete a posting
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CliperCommands {
    /// Browse clipers
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Fetch this many consecutive pages and merge them
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Your clipers
    Mine,
    /// Show one cliper
    Show { id: String },
    /// Upload a video
    Upload {
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Wait until the backend finishes processing
        #[arg(long)]
        wait: bool,
    },
    /// Delete a cliper
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FeedCommands {
    /// Browse the feed
    Posts {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Publish a text post
    Post { content: String },
    /// Like a post
    Like { id: String },
    /// Comments on a post
    Comments { id: String },
    /// Comment on a post
    Comment { id: String, content: String },
    /// Replace the text of a post
    Edit { id: String, content: String },
    /// Delete a post
    Delete { id: String },
    /// Replace the text of a comment
    EditComment {
        post_id: String,
        comment_id: String,
        content: String,
    },
    /// Delete a comment
    DeleteComment { post_id: String, comment_id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show your account profile
    Show,
    /// Update account fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Upload a new avatar image
    Avatar { path: PathBuf },
    /// Remove the avatar image
    DeleteAvatar,
    /// Show the CV extracted for job matching
    Ats,
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// Show a company by id
    Show { id: String },
    /// Show the company owned by a user
    User { user_id: String },
}
