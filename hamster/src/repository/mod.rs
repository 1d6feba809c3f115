use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod database_manager;
pub mod fact_repository;
pub(crate) mod sqlite;

/// A thread-safe, shared connection to an ``SQLite`` database,
/// used across multiple repository layers.
pub(crate) type SharedSqliteConnection = Arc<Mutex<Connection>>;
