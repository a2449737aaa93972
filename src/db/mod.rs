//! Incident log storage: SQLite connection, migrations and repositories.

pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration {version} ({name}) failed: {reason}")]
    MigrationFailed {
        version: u32,
        name: &'static str,
        reason: String,
    },

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}
