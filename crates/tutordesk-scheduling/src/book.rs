//! Session book
//!
//! Tutoring sessions persisted in the `sessions` table. Every mutation is
//! written through before the cache is updated.

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tutordesk_storage::{Database, Table};

use crate::calendar;
use crate::error::SchedulingError;
use crate::session::TutoringSession;
use crate::upcoming;
use crate::Result;

pub struct SessionBook {
    /// In-memory session cache
    sessions: Arc<RwLock<HashMap<String, TutoringSession>>>,
    /// Database for persistence
    db: Database,
}

impl SessionBook {
    pub fn new(db: Database) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    /// Load all sessions from the database into the cache
    pub fn load(&self) -> Result<usize> {
        let mut loaded = HashMap::new();
        for record in self.db.select(Table::Sessions)? {
            match record.parse::<TutoringSession>() {
                Ok(session) => {
                    loaded.insert(session.id.clone(), session);
                }
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "Skipping unreadable session record");
                }
            }
        }

        let count = loaded.len();
        *self.sessions.write() = loaded;

        tracing::info!(count, "Loaded tutoring sessions");

        Ok(count)
    }

    /// Book a new session
    pub fn create(&self, session: TutoringSession) -> Result<TutoringSession> {
        self.db
            .insert(Table::Sessions, serde_json::to_value(&session)?)?;
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());

        tracing::info!(
            session_id = %session.id,
            starts_at = %session.starts_at,
            duration_minutes = session.duration_minutes,
            "Booked tutoring session"
        );

        Ok(session)
    }

    pub fn get(&self, session_id: &str) -> Result<TutoringSession> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SchedulingError::SessionNotFound(session_id.to_string()))
    }

    /// All sessions, earliest first
    pub fn list(&self) -> Vec<TutoringSession> {
        let mut sessions: Vec<TutoringSession> = self.sessions.read().values().cloned().collect();
        sessions.sort_by_key(|session| session.starts_at);
        sessions
    }

    pub fn reschedule(&self, session_id: &str, starts_at: NaiveDateTime) -> Result<TutoringSession> {
        self.modify(session_id, |session| {
            session.reschedule(starts_at);
            Ok(())
        })
    }

    /// Drop a session onto a calendar cell
    pub fn move_to(
        &self,
        session_id: &str,
        date: NaiveDate,
        hour: Option<u32>,
    ) -> Result<TutoringSession> {
        self.modify(session_id, |session| session.move_to(date, hour))
    }

    pub fn complete(&self, session_id: &str) -> Result<TutoringSession> {
        self.modify(session_id, TutoringSession::complete)
    }

    pub fn cancel(&self, session_id: &str) -> Result<TutoringSession> {
        self.modify(session_id, TutoringSession::cancel)
    }

    pub fn delete(&self, session_id: &str) -> Result<()> {
        if !self.db.delete(Table::Sessions, session_id)? {
            return Err(SchedulingError::SessionNotFound(session_id.to_string()));
        }
        self.sessions.write().remove(session_id);

        tracing::info!(session_id = %session_id, "Deleted tutoring session");

        Ok(())
    }

    /// Sessions starting on `date`, earliest first
    pub fn sessions_for_day(&self, date: NaiveDate) -> Vec<TutoringSession> {
        let sessions: Vec<TutoringSession> = self.sessions.read().values().cloned().collect();
        calendar::sessions_for_day(&sessions, date)
    }

    /// Sessions still scheduled at or after `now`, closest first
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<TutoringSession> {
        let sessions: Vec<TutoringSession> = self.sessions.read().values().cloned().collect();
        upcoming::upcoming(&sessions, now)
    }

    /// Apply `change` to a copy, persist it, then publish it to the cache
    fn modify<F>(&self, session_id: &str, change: F) -> Result<TutoringSession>
    where
        F: FnOnce(&mut TutoringSession) -> Result<()>,
    {
        let mut session = self.get(session_id)?;
        change(&mut session)?;

        self.db.update(
            Table::Sessions,
            &session.id,
            serde_json::to_value(&session)?,
        )?;
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());

        tracing::info!(
            session_id = %session.id,
            status = session.status.as_str(),
            starts_at = %session.starts_at,
            "Updated tutoring session"
        );

        Ok(session)
    }
}

impl Clone for SessionBook {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            db: self.db.clone(),
        }
    }
}
