//! TutorDesk Storage Layer
//!
//! SQLite-backed persistence for students, sessions, notes, tutors and
//! users, plus a key/value settings table. Records are stored raw;
//! masking happens only at display time.

mod database;
mod error;
mod migrations;
mod record;

pub use database::Database;
pub use error::StorageError;
pub use record::{Record, Table};

pub type Result<T> = std::result::Result<T, StorageError>;
