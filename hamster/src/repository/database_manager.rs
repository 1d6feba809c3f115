use crate::error::HamsterError;
use crate::repository::fact_repository::FactRepository;
use crate::repository::sqlite::{self, sqlite_fact_repo::SqliteFactRepository};
use crate::repository::SharedSqliteConnection;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Represents parameters for initializing the database connection
pub enum DatabaseConfig {
    /// SQLite database with a specific file path
    SqliteOnDisk { path: PathBuf },

    /// SQLite database that runs entirely in memory
    SqliteInMemory,
}

pub struct DatabaseManager {
    connection: SharedSqliteConnection,
}

impl DatabaseManager {
    /// Opens the database and creates the schema if needed
    ///
    /// # Errors
    /// Returns an error if the database can not be opened or the schema not created
    pub fn new(config: &DatabaseConfig) -> Result<Self, HamsterError> {
        let connection = match config {
            DatabaseConfig::SqliteOnDisk { path } => sqlite::create_connection(path)?,
            DatabaseConfig::SqliteInMemory => Connection::open_in_memory()?,
        };
        let connection = Arc::new(Mutex::new(connection));

        sqlite::create_schema(&connection)?;

        Ok(Self { connection })
    }

    #[must_use]
    pub fn create_fact_repository(&self) -> Arc<dyn FactRepository> {
        Arc::new(SqliteFactRepository::new(self.connection.clone()))
    }
}
