//! Student records
//!
//! Collected by the intake form and stored raw. Anything shown on screen
//! goes through `StudentCard`, which masks the PII fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulingError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// e.g. "Mother", "Father", "Guardian"
    #[serde(default)]
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub guardian: Option<Guardian>,
    /// Subjects the student wants tutoring in
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Student {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Result<Self> {
        let first_name = first_name.into();
        if first_name.trim().is_empty() {
            return Err(SchedulingError::EmptyName);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name: last_name.into(),
            preferred_name: None,
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            grade: None,
            school: None,
            guardian: None,
            subjects: Vec::new(),
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_guardian(mut self, guardian: Guardian) -> Self {
        self.guardian = Some(guardian);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// "First Last", or just the first name when no last name was given
    pub fn full_name(&self) -> String {
        if self.last_name.trim().is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}
