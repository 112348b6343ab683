//! Scheduling error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tutordesk_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot {action} a session that is {status}")]
    InvalidStatusChange { action: String, status: String },

    #[error("Student name cannot be empty")]
    EmptyName,

    #[error("Unknown calendar view: {0}")]
    UnknownCalendarView(String),

    #[error("Invalid hour: {0}")]
    InvalidHour(u32),
}
