use std::{io, path::PathBuf};

use crate::date;
use redmine::RedmineError;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum HamsterError {
    #[error("Unable to load the application configuration file {path:?}")]
    ApplicationConfig { path: PathBuf, source: io::Error },
    #[error("Unable to parse contents of {path:?}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Redmine error: {0}")]
    Redmine(#[from] RedmineError),
    #[error("Redmine integration is not enabled in the configuration")]
    RedmineIntegrationDisabled,
    #[error("No Redmine API key configured, use 'hamster config update --api-key'")]
    ApiKeyNotConfigured,
    #[error("Unable to open DBMS in file {path}: {reason}")]
    OpenDbms { path: String, reason: String },
    #[error("SQL dbms error: {0}")]
    Sql(String),
    #[error("Directory creation failed")]
    CreateDir(#[from] io::Error),
    #[error("Could not make sense of input: {0}")]
    BadInput(String),
    #[error("Activity name cannot be empty!")]
    EmptyActivityName,
    #[error("Redmine activity cannot be empty!")]
    MissingRedmineActivity,
    #[error("Invalid arbitrary issue number: {0}")]
    InvalidIssueId(String),
    #[error("No issue assigned to you with subject '{0}'")]
    UnknownIssue(String),
    #[error("Unknown Redmine activity '{0}'")]
    UnknownActivity(String),
    #[error("An activity is already being tracked, stop it first")]
    ActiveFactExists,
    #[error("No activity is being tracked")]
    NoActiveFact,
    #[error("Mutex locking error")]
    LockPoisoned,
}

impl From<rusqlite::Error> for HamsterError {
    fn from(err: rusqlite::Error) -> Self {
        HamsterError::Sql(format!("Sqlite error {err}"))
    }
}

impl From<date::Error> for HamsterError {
    fn from(err: date::Error) -> Self {
        HamsterError::BadInput(format!("{err}"))
    }
}
