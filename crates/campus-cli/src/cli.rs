use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "campus",
    about = "Unistone campus OS local data shell",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CollectionName {
    Buildings,
    Courses,
    Faculty,
    Students,
    Media,
    Events,
    Jobs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the persistence state of every store key
    Status,
    /// Log in and record the current identity
    Login(LoginArgs),
    /// Forget the current identity
    Logout,
    /// Show the current identity
    Whoami,
    /// List a collection
    List(ListArgs),
    /// Add or replace a record (admin only)
    Put(PutArgs),
    /// Remove a record (admin only)
    Remove(RemoveArgs),
    /// Discard edits and restore the seed catalog (admin only)
    Reset(ResetArgs),
    /// Show or change the brand logo (admin only to change)
    Logo(LogoArgs),
    /// Ask the campus assistant
    Chat(ChatArgs),
    /// Run an attendance session from the faculty view to the student view
    Attendance(AttendanceArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    #[arg(short, long, default_value = "student")]
    pub role: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub collection: CollectionName,
}

#[derive(Args)]
pub struct PutArgs {
    pub collection: CollectionName,
    /// Record as JSON. A missing `id` gets a fresh one.
    pub json: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub collection: CollectionName,
    pub id: String,
}

#[derive(Args)]
pub struct ResetArgs {
    pub collection: CollectionName,
}

#[derive(Args)]
pub struct LogoArgs {
    pub url: Option<String>,
    #[arg(long, conflicts_with = "url")]
    pub clear: bool,
}

#[derive(Args)]
pub struct ChatArgs {
    #[arg(required = true)]
    pub prompt: Vec<String>,
}

#[derive(Args)]
pub struct AttendanceArgs {
    #[arg(long)]
    pub course: Option<String>,
    /// Leave the prompt unacknowledged.
    #[arg(long)]
    pub no_ack: bool,
}
