//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found in {table}: {id}")]
    NotFound { table: String, id: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
