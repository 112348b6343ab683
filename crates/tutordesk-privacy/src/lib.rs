//! TutorDesk Privacy
//!
//! PII shown on calendar cells, session cards and student lists passes
//! through the masking engine first. Default levels:
//!
//! | Field          | Default |
//! | First name     | Partial |
//! | Last name      | Partial |
//! | Phone          | Full    |
//! | Email          | Partial |
//! | Street address | Full    |
//!
//! Levels are chosen per user session and only affect display; stored
//! records always hold the raw values.

mod error;
mod field;
mod level;
mod masking;
mod preferences;
mod registry;
mod settings;

pub use error::PrivacyError;
pub use field::FieldKind;
pub use level::MaskLevel;
pub use masking::mask;
pub use preferences::{PreferenceSet, PreferenceStore};
pub use registry::PreferenceRegistry;
pub use settings::{settings_rows, PreferenceRow};

pub type Result<T> = std::result::Result<T, PrivacyError>;
