//! PII field kinds
//!
//! The key a displayed attribute is masked under. Keys outside the known
//! set are kept verbatim in `Other` so preferences written by newer
//! settings screens survive a round trip.

use serde::{Deserialize, Serialize};

use crate::level::MaskLevel;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    FirstName,
    LastName,
    Phone,
    Email,
    Address,
    Other(String),
}

impl FieldKind {
    /// Known kinds, in the order the settings screen lists them
    pub const KNOWN: [FieldKind; 5] = [
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Phone,
        FieldKind::Email,
        FieldKind::Address,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::FirstName => "firstName",
            FieldKind::LastName => "lastName",
            FieldKind::Phone => "phone",
            FieldKind::Email => "email",
            FieldKind::Address => "address",
            FieldKind::Other(key) => key,
        }
    }

    /// Label shown in the privacy settings; unknown keys show their raw key
    pub fn label(&self) -> &str {
        match self {
            FieldKind::FirstName => "First Name",
            FieldKind::LastName => "Last Name",
            FieldKind::Phone => "Phone Number",
            FieldKind::Email => "Email",
            FieldKind::Address => "Street Address",
            FieldKind::Other(key) => key,
        }
    }

    /// The kind this key names; `Other` holding a known key becomes that kind
    pub fn canonical(&self) -> FieldKind {
        match self {
            FieldKind::Other(key) => FieldKind::from(key.as_str()),
            known => known.clone(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldKind::Other(_))
    }

    /// Level used when no preference has been recorded for this field
    pub fn default_level(&self) -> MaskLevel {
        match self {
            FieldKind::FirstName => MaskLevel::Partial,
            FieldKind::LastName => MaskLevel::Partial,
            FieldKind::Phone => MaskLevel::Full,
            FieldKind::Email => MaskLevel::Partial,
            FieldKind::Address => MaskLevel::Full,
            FieldKind::Other(_) => MaskLevel::Full,
        }
    }
}

impl From<&str> for FieldKind {
    fn from(key: &str) -> Self {
        match key {
            "firstName" => FieldKind::FirstName,
            "lastName" => FieldKind::LastName,
            "phone" => FieldKind::Phone,
            "email" => FieldKind::Email,
            "address" => FieldKind::Address,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldKind {
    fn from(key: String) -> Self {
        match FieldKind::from(key.as_str()) {
            FieldKind::Other(_) => FieldKind::Other(key),
            known => known,
        }
    }
}

impl From<FieldKind> for String {
    fn from(field: FieldKind) -> Self {
        match field {
            FieldKind::Other(key) => key,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_round_trip() {
        for field in FieldKind::KNOWN {
            assert_eq!(FieldKind::from(field.as_str()), field);
            assert!(field.is_known());
        }
    }

    #[test]
    fn test_unknown_key_is_kept() {
        let field = FieldKind::from("guardianPhone");
        assert_eq!(field, FieldKind::Other("guardianPhone".to_string()));
        assert_eq!(field.as_str(), "guardianPhone");
        assert_eq!(field.label(), "guardianPhone");
        assert!(!field.is_known());

        // Keys are case sensitive, like the record keys they name
        assert!(!FieldKind::from("FirstName").is_known());
    }

    #[test]
    fn test_canonical() {
        assert_eq!(FieldKind::Other("phone".to_string()).canonical(), FieldKind::Phone);
        assert_eq!(FieldKind::Email.canonical(), FieldKind::Email);
        assert_eq!(
            FieldKind::Other("school".to_string()).canonical(),
            FieldKind::Other("school".to_string())
        );
    }

    #[test]
    fn test_serializes_as_key() {
        let json = serde_json::to_string(&FieldKind::FirstName).unwrap();
        assert_eq!(json, "\"firstName\"");

        let field: FieldKind = serde_json::from_str("\"school\"").unwrap();
        assert_eq!(field, FieldKind::Other("school".to_string()));
    }
}
