//! Privacy error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrivacyError {
    /// A preference store was requested for a session that was never opened
    #[error("Preference store not initialized for session: {0}")]
    NotInitialized(String),

    #[error("Unknown mask level: {0}")]
    UnknownMaskLevel(String),
}
