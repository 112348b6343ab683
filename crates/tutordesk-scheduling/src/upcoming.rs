//! Upcoming sessions list

use chrono::NaiveDateTime;

use crate::session::TutoringSession;

/// Sessions still scheduled at or after `now`, closest first
pub fn upcoming(sessions: &[TutoringSession], now: NaiveDateTime) -> Vec<TutoringSession> {
    let mut upcoming: Vec<TutoringSession> = sessions
        .iter()
        .filter(|session| session.is_upcoming() && session.starts_at >= now)
        .cloned()
        .collect();
    upcoming.sort_by_key(|session| session.starts_at);
    upcoming
}
