//! Mask levels
//!
//! | Level   | Exposure                     |
//! | none    | raw value                    |
//! | partial | leading characters + `***`   |
//! | full    | placeholder only             |

use serde::{Deserialize, Serialize};

use crate::error::PrivacyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskLevel {
    /// Show the value as entered
    None,
    /// Keep a short prefix, hide the rest
    Partial,
    /// Hide everything
    Full,
}

impl MaskLevel {
    /// Every level, in the order the settings selector lists them
    pub const ALL: [MaskLevel; 3] = [MaskLevel::None, MaskLevel::Partial, MaskLevel::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaskLevel::None => "none",
            MaskLevel::Partial => "partial",
            MaskLevel::Full => "full",
        }
    }

    /// Label shown next to the level in the privacy settings
    pub fn label(&self) -> &'static str {
        match self {
            MaskLevel::None => "None (Show Full)",
            MaskLevel::Partial => "Partial Mask",
            MaskLevel::Full => "Full Mask",
        }
    }

    /// Whether a value rendered at this level still shows the raw text
    pub fn reveals_raw(&self) -> bool {
        matches!(self, MaskLevel::None)
    }
}

impl std::fmt::Display for MaskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaskLevel {
    type Err = PrivacyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(MaskLevel::None),
            "partial" => Ok(MaskLevel::Partial),
            "full" => Ok(MaskLevel::Full),
            _ => Err(PrivacyError::UnknownMaskLevel(s.to_string())),
        }
    }
}
