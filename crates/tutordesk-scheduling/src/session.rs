//! Tutoring session data structure
//!
//! Status lifecycle:
//! ```text
//! Upcoming
//!   ├─ complete → Completed
//!   └─ cancel   → Canceled
//! ```

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulingError;
use crate::Result;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Virtual,
    InPerson,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Virtual => "virtual",
            SessionType::InPerson => "in-person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Upcoming,
    Completed,
    Canceled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Upcoming => "upcoming",
            SessionStatus::Completed => "completed",
            SessionStatus::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Recurrence {
    /// Start of the occurrence after one starting at `from`
    pub fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Recurrence::Daily => from.checked_add_signed(Duration::days(1)),
            Recurrence::Weekly => from.checked_add_signed(Duration::weeks(1)),
            Recurrence::Biweekly => from.checked_add_signed(Duration::weeks(2)),
            Recurrence::Monthly => from.checked_add_months(Months::new(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutoringSession {
    /// Unique identifier
    pub id: String,
    /// Roster entry, when the session was booked for a known student
    #[serde(default)]
    pub student_id: Option<String>,
    /// Student name as entered on the session form
    pub student_name: String,
    pub subject: String,
    /// Local wall-clock start
    pub starts_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub session_type: SessionType,
    pub status: SessionStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Calendar accent color, e.g. "#4CAF50"
    #[serde(default)]
    pub color: Option<String>,
}

impl TutoringSession {
    pub fn new(
        student_name: impl Into<String>,
        subject: impl Into<String>,
        starts_at: NaiveDateTime,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: None,
            student_name: student_name.into(),
            subject: subject.into(),
            starts_at,
            duration_minutes,
            session_type: SessionType::Virtual,
            status: SessionStatus::Upcoming,
            location: None,
            notes: None,
            recurrence: None,
            color: None,
        }
    }

    pub fn with_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether the session starts on `date`
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.starts_at.date() == date
    }

    pub fn is_upcoming(&self) -> bool {
        self.status == SessionStatus::Upcoming
    }

    pub fn complete(&mut self) -> Result<()> {
        self.transition("complete", SessionStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.transition("cancel", SessionStatus::Canceled)
    }

    fn transition(&mut self, action: &str, target: SessionStatus) -> Result<()> {
        if self.status != SessionStatus::Upcoming {
            return Err(SchedulingError::InvalidStatusChange {
                action: action.to_string(),
                status: self.status.as_str().to_string(),
            });
        }

        self.status = target;
        Ok(())
    }

    pub fn reschedule(&mut self, starts_at: NaiveDateTime) {
        self.starts_at = starts_at;
    }

    /// Move the session onto a calendar cell. Month cells carry only a
    /// date and keep the time of day; day and week cells carry an hour.
    pub fn move_to(&mut self, date: NaiveDate, hour: Option<u32>) -> Result<()> {
        let time = match hour {
            Some(hour) => {
                NaiveTime::from_hms_opt(hour, 0, 0).ok_or(SchedulingError::InvalidHour(hour))?
            }
            None => self.starts_at.time(),
        };

        self.starts_at = date.and_time(time);
        Ok(())
    }

    /// Start of the next occurrence of a recurring session
    pub fn next_occurrence(&self) -> Option<NaiveDateTime> {
        self.recurrence
            .and_then(|recurrence| recurrence.advance(self.starts_at))
    }
}
