//! Display views
//!
//! Everything a calendar cell, session card or student list shows about a
//! student is masked here with the viewing session's preferences. Views
//! hold only display strings, never the raw record.

use serde::Serialize;
use tutordesk_privacy::{FieldKind, PreferenceStore};

use crate::session::TutoringSession;
use crate::student::Student;

const GUARDIAN_NAME: &str = "guardianName";

/// Mask a "First Last" display name; everything after the first space is
/// treated as the last name.
pub fn masked_student_name(name: &str, preferences: &PreferenceStore) -> String {
    let name = name.trim();
    let (first, last) = match name.split_once(' ') {
        Some((first, last)) => (first, last.trim()),
        None => (name, ""),
    };

    let first = preferences.mask(first, &FieldKind::FirstName);
    let last = preferences.mask(last, &FieldKind::LastName);

    if last.is_empty() {
        first
    } else {
        format!("{} {}", first, last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCard {
    pub id: String,
    pub student: String,
    pub subject: String,
    /// e.g. "Mon, Mar 4"
    pub date: String,
    /// e.g. "3:00 PM - 4:00 PM"
    pub time_range: String,
    /// e.g. "60 min"
    pub duration: String,
    pub session_type: String,
    pub status: String,
    pub color: Option<String>,
}

impl SessionCard {
    pub fn render(session: &TutoringSession, preferences: &PreferenceStore) -> Self {
        Self {
            id: session.id.clone(),
            student: masked_student_name(&session.student_name, preferences),
            subject: session.subject.clone(),
            date: session.starts_at.format("%a, %b %-d").to_string(),
            time_range: format!(
                "{} - {}",
                session.starts_at.format("%-I:%M %p"),
                session.ends_at().format("%-I:%M %p")
            ),
            duration: format!("{} min", session.duration_minutes),
            session_type: session.session_type.as_str().to_string(),
            status: session.status.as_str().to_string(),
            color: session.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCard {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub guardian: Option<String>,
    pub subjects: Vec<String>,
}

impl StudentCard {
    pub fn render(student: &Student, preferences: &PreferenceStore) -> Self {
        Self {
            id: student.id.clone(),
            first_name: preferences.mask(&student.first_name, &FieldKind::FirstName),
            last_name: preferences.mask(&student.last_name, &FieldKind::LastName),
            phone: preferences.mask(&student.phone, &FieldKind::Phone),
            email: preferences.mask(&student.email, &FieldKind::Email),
            address: preferences.mask(&student.address, &FieldKind::Address),
            guardian: student
                .guardian
                .as_ref()
                .map(|guardian| preferences.mask(&guardian.name, &FieldKind::from(GUARDIAN_NAME))),
            subjects: student.subjects.clone(),
        }
    }
}
