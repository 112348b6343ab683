//! TutorDesk Core
//!
//! Central coordination layer for the TutorDesk scheduler. The UI reads
//! masked views from here and never touches raw student records.

mod config;
mod desk;
mod error;

pub use config::Config;
pub use desk::Desk;
pub use error::CoreError;

// Re-export core components
pub use tutordesk_privacy::{
    mask, FieldKind, MaskLevel, PreferenceRegistry, PreferenceRow, PreferenceSet,
    PreferenceStore, PrivacyError,
};
pub use tutordesk_scheduling::{
    Calendar, CalendarView, Guardian, Recurrence, SchedulingError, SessionBook, SessionCard,
    SessionStatus, SessionType, Student, StudentCard, StudentRoster, TutoringSession,
};
pub use tutordesk_storage::{Database, Record, StorageError, Table};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
