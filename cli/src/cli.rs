use std::fmt::{self, Formatter};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
/// Hamster time tracker - track what you do and register the time spent in Redmine
///
/// Activities are written as `name@category, description`, i.e.
/// `bug hunting@Hamster, tray icon flickers`.
///
/// Times are given as `HH:MM` for today, `YYYY-MM-DD` for 08:00 on that date or
/// `YYYY-MM-DDTHH:MM`. Local timezone is always assumed.
#[command(author, version, about)] // Read from Cargo.toml
pub(crate) struct Opts {
    #[command(subcommand)]
    pub cmd: Command,

    #[arg(global = true, short, long)]
    pub verbosity: Option<LogLevel>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start tracking an activity
    Start(Start),
    /// Stop tracking the current activity, registering the time spent in Redmine
    Stop(Stop),
    /// Show the current activity and today's activities
    Status,
    /// List the Redmine issues assigned to you
    Issues,
    /// List the Redmine time entry activities
    Activities,
    /// Check the connection to Redmine
    Check,
    /// Subcommands for configuration
    Config(Config),
}

#[derive(Args)]
pub(crate) struct Start {
    /// The activity, `name@category, description`
    #[arg(required = true)]
    pub fact: String,
    /// Tags, separated by commas or white space
    #[arg(short, long, default_value = "")]
    pub tags: String,
    /// Subject of one of the Redmine issues assigned to you
    #[arg(short, long)]
    pub issue: Option<String>,
    /// Any Redmine issue number
    #[arg(long, conflicts_with = "issue")]
    pub issue_id: Option<String>,
    /// The Redmine time entry activity, required with an issue
    #[arg(short, long)]
    pub activity: Option<String>,
    /// Start time, default is now
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub(crate) struct Stop {
    /// End time, default is now
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    pub cmd: ConfigCommand,
}

/// Create, modify or list the configuration file.
#[derive(Subcommand, Clone)]
pub(crate) enum ConfigCommand {
    /// Update the configuration file
    Update(UpdateConfiguration),
    /// write current configuration to standard output
    List,
    /// Remove the current configuration
    Remove,
}

#[derive(Args, Clone)]
pub(crate) struct UpdateConfiguration {
    /// Your Redmine API access key, found under "My account"
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
    /// The base url of your Redmine, i.e. <https://redmine.example.com/>
    #[arg(long)]
    pub url: Option<String>,
    /// Register the time spent in Redmine when an activity is stopped
    #[arg(long)]
    pub enable: bool,
    /// Stop registering time in Redmine
    #[arg(long, conflicts_with = "enable")]
    pub disable: bool,
    /// Location of the local database
    #[arg(long)]
    pub database: Option<String>,
}
