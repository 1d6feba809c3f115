use crate::error::HamsterError;
use crate::repository::SharedSqliteConnection;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub mod sqlite_fact_repo;

/// Creates the entire database schema
pub(crate) fn create_schema(connection: &SharedSqliteConnection) -> Result<(), HamsterError> {
    sqlite_fact_repo::create_fact_table(connection)?;
    Ok(())
}

pub(crate) fn create_connection(dbms_path: &Path) -> Result<Connection, HamsterError> {
    if let Some(parent) = dbms_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Connection::open(dbms_path).map_err(|e| HamsterError::OpenDbms {
        path: dbms_path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })
}
