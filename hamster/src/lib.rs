//! Local time tracking with optional registration of the time spent in Redmine.
use std::path::PathBuf;
use std::sync::Arc;

use config::{ConfigurationProvider, FileConfiguration};
use error::HamsterError;
use log::debug;
use repository::database_manager::{DatabaseConfig, DatabaseManager};
use service::redmine_api::{HttpRedmineConnector, RedmineConnector};
use service::tracking::TrackingSession;

pub mod config;
pub mod date;
pub mod error;
pub mod repository;
pub mod service;

pub mod types;

pub struct ApplicationRuntime {
    tracking_session: TrackingSession,
}

impl ApplicationRuntime {
    /// Creates the runtime from the configuration file of the current user.
    ///
    /// The Redmine settings are read from the configuration file whenever they are needed,
    /// so changes made while the runtime exists take effect on the next operation.
    ///
    /// # Errors
    ///
    /// - Returns an error if the configuration fails to load.
    /// - Returns an error if the local database can not be opened.
    pub fn new() -> Result<Self, HamsterError> {
        let config = config::load_or_default()?;
        ApplicationRuntimeBuilder::new()
            .with_database_path(PathBuf::from(&config.application_data.database))
            .build()
    }

    pub fn tracking_session(&self) -> &TrackingSession {
        &self.tracking_session
    }
}

enum DatabaseChoice {
    InMemory,
    OnDisk(PathBuf),
}

/// Assembles an `ApplicationRuntime`, by default from the user's configuration file,
/// the default database and the Redmine server over HTTP
pub struct ApplicationRuntimeBuilder {
    database: Option<DatabaseChoice>,
    configuration: Option<Arc<dyn ConfigurationProvider>>,
    connector: Option<Arc<dyn RedmineConnector>>,
}

impl Default for ApplicationRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationRuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            database: None,
            configuration: None,
            connector: None,
        }
    }

    #[must_use]
    pub fn use_in_memory_db(mut self) -> Self {
        self.database = Some(DatabaseChoice::InMemory);
        self
    }

    #[must_use]
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database = Some(DatabaseChoice::OnDisk(path));
        self
    }

    #[must_use]
    pub fn with_configuration(mut self, configuration: Arc<dyn ConfigurationProvider>) -> Self {
        self.configuration = Some(configuration);
        self
    }

    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn RedmineConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// # Errors
    /// Returns an error if the database can not be opened
    pub fn build(self) -> Result<ApplicationRuntime, HamsterError> {
        let database_config = match self.database {
            Some(DatabaseChoice::InMemory) => DatabaseConfig::SqliteInMemory,
            Some(DatabaseChoice::OnDisk(path)) => DatabaseConfig::SqliteOnDisk { path },
            None => DatabaseConfig::SqliteOnDisk {
                path: config::database_file(),
            },
        };
        if let DatabaseConfig::SqliteOnDisk { path } = &database_config {
            debug!("Opening database {}", path.display());
        }
        let database_manager = DatabaseManager::new(&database_config)?;

        let configuration = self
            .configuration
            .unwrap_or_else(|| Arc::new(FileConfiguration::default()));
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(HttpRedmineConnector));

        Ok(ApplicationRuntime {
            tracking_session: TrackingSession::new(
                configuration,
                database_manager.create_fact_repository(),
                connector,
            ),
        })
    }
}
