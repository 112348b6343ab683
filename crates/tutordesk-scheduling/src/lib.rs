//! TutorDesk Scheduling
//!
//! - Students and tutoring sessions are stored raw in the database
//! - Day, week and month calendar ranges (weeks start on Sunday)
//! - Upcoming sessions are listed closest first
//! - Cards shown to a user are masked with that user's preferences

mod book;
mod calendar;
mod display;
mod error;
mod roster;
mod session;
mod student;
mod upcoming;

pub use book::SessionBook;
pub use calendar::{sessions_for_day, time_slots, Calendar, CalendarView};
pub use display::{masked_student_name, SessionCard, StudentCard};
pub use error::SchedulingError;
pub use roster::StudentRoster;
pub use session::{
    Recurrence, SessionStatus, SessionType, TutoringSession, DEFAULT_DURATION_MINUTES,
};
pub use student::{Guardian, Student};
pub use upcoming::upcoming;

pub type Result<T> = std::result::Result<T, SchedulingError>;
