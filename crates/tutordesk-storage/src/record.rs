//! Entity tables and stored records

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Students,
    Sessions,
    Notes,
    Tutors,
    Users,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Students,
        Table::Sessions,
        Table::Notes,
        Table::Tutors,
        Table::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Students => "students",
            Table::Sessions => "sessions",
            Table::Notes => "notes",
            Table::Tutors => "tutors",
            Table::Users => "users",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Table {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "students" => Ok(Table::Students),
            "sessions" => Ok(Table::Sessions),
            "notes" => Ok(Table::Notes),
            "tutors" => Ok(Table::Tutors),
            "users" => Ok(Table::Users),
            _ => Err(StorageError::InvalidRecord(format!("Unknown table: {}", s))),
        }
    }
}

/// One row of an entity table. `data` is always a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Decode the record's data into a typed entity
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}
