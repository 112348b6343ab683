//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tutordesk_storage::StorageError),

    #[error("Scheduling error: {0}")]
    Scheduling(#[from] tutordesk_scheduling::SchedulingError),

    #[error("Privacy error: {0}")]
    Privacy(#[from] tutordesk_privacy::PrivacyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Data directory creation
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
