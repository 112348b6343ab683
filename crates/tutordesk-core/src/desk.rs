//! Main application state container
//!
//! Owns the database, the roster, the session book and one preference
//! store per signed-in user session. Every view handed to the UI is
//! masked with the requesting session's store.

use chrono::{NaiveDate, NaiveDateTime};

use tutordesk_privacy::{
    settings_rows, FieldKind, MaskLevel, PreferenceRegistry, PreferenceRow, PreferenceSet,
    PreferenceStore,
};
use tutordesk_scheduling::{
    time_slots, Calendar, SessionBook, SessionCard, StudentCard, StudentRoster,
};
use tutordesk_storage::Database;

use crate::config::Config;
use crate::Result;

const PREFERENCES_KEY_PREFIX: &str = "mask_preferences";

pub struct Desk {
    /// Configuration
    config: Config,
    /// Database
    db: Database,
    /// Student roster
    roster: StudentRoster,
    /// Tutoring sessions
    book: SessionBook,
    /// Per-user-session mask preferences
    preferences: PreferenceRegistry,
}

impl Desk {
    /// Open the database named by `config`
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Self {
        Self {
            roster: StudentRoster::new(db.clone()),
            book: SessionBook::new(db.clone()),
            preferences: PreferenceRegistry::new(),
            config,
            db,
        }
    }

    /// Load students and sessions
    pub fn initialize(&self) -> Result<()> {
        let students = self.roster.load()?;
        let sessions = self.book.load()?;

        tracing::info!(students, sessions, "TutorDesk initialized");

        Ok(())
    }

    // === Privacy ===

    /// Start a user session, restoring its saved preferences when enabled
    ///
    /// Opening a session that is already open returns its live store.
    pub fn open_session(&self, session_id: &str) -> Result<PreferenceStore> {
        let saved = if self.config.persist_preferences {
            self.load_preferences(session_id)?
        } else {
            None
        };

        Ok(self
            .preferences
            .open_with(session_id, saved.unwrap_or_default()))
    }

    /// End a user session, saving its preferences when enabled
    pub fn close_session(&self, session_id: &str) -> Result<PreferenceSet> {
        let preferences = self.preferences.close(session_id)?;
        if self.config.persist_preferences {
            self.save_preferences(session_id, &preferences)?;
        }
        Ok(preferences)
    }

    /// Store of an open session; fails if `open_session` was never called
    pub fn preferences(&self, session_id: &str) -> Result<PreferenceStore> {
        Ok(self.preferences.store(session_id)?)
    }

    pub fn update_preference(
        &self,
        session_id: &str,
        field: FieldKind,
        level: MaskLevel,
    ) -> Result<PreferenceSet> {
        let store = self.preferences(session_id)?;
        if self.config.persist_preferences {
            let updated = store.get_preferences().with(field.clone(), level);
            self.save_preferences(session_id, &updated)?;
        }

        store.update_preference(field, level);
        Ok(store.get_preferences())
    }

    pub fn set_preferences(&self, session_id: &str, preferences: PreferenceSet) -> Result<()> {
        let store = self.preferences(session_id)?;
        if self.config.persist_preferences {
            self.save_preferences(session_id, &preferences)?;
        }
        store.set_preferences(preferences);
        Ok(())
    }

    pub fn settings_rows(&self, session_id: &str) -> Result<Vec<PreferenceRow>> {
        let store = self.preferences(session_id)?;
        Ok(settings_rows(&store.get_preferences()))
    }

    fn load_preferences(&self, session_id: &str) -> Result<Option<PreferenceSet>> {
        let Some(json) = self.db.get_setting(&preferences_key(session_id))? else {
            return Ok(None);
        };

        match serde_json::from_str::<PreferenceSet>(&json) {
            Ok(preferences) => Ok(Some(preferences)),
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Ignoring unreadable saved mask preferences"
                );
                Ok(None)
            }
        }
    }

    fn save_preferences(&self, session_id: &str, preferences: &PreferenceSet) -> Result<()> {
        let json = serde_json::to_string(preferences)?;
        self.db.set_setting(&preferences_key(session_id), &json)?;
        Ok(())
    }

    // === Views ===

    /// Calendar anchored on `date` in the configured default view
    pub fn calendar(&self, date: NaiveDate) -> Calendar {
        Calendar::new(self.config.default_view, date)
    }

    /// Hourly slots of the day and week views
    pub fn time_slots(&self) -> Vec<u32> {
        time_slots(self.config.day_start_hour, self.config.day_end_hour)
    }

    pub fn session_cards_for_day(&self, session_id: &str, date: NaiveDate) -> Result<Vec<SessionCard>> {
        let store = self.preferences(session_id)?;
        Ok(self
            .book
            .sessions_for_day(date)
            .iter()
            .map(|session| SessionCard::render(session, &store))
            .collect())
    }

    pub fn upcoming_cards(&self, session_id: &str, now: NaiveDateTime) -> Result<Vec<SessionCard>> {
        let store = self.preferences(session_id)?;
        Ok(self
            .book
            .upcoming(now)
            .iter()
            .map(|session| SessionCard::render(session, &store))
            .collect())
    }

    pub fn student_cards(&self, session_id: &str) -> Result<Vec<StudentCard>> {
        let store = self.preferences(session_id)?;
        Ok(self
            .roster
            .list()
            .iter()
            .map(|student| StudentCard::render(student, &store))
            .collect())
    }

    // === Accessors ===

    pub fn roster(&self) -> &StudentRoster {
        &self.roster
    }

    pub fn book(&self) -> &SessionBook {
        &self.book
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for Desk {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            roster: self.roster.clone(),
            book: self.book.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

fn preferences_key(session_id: &str) -> String {
    format!("{}:{}", PREFERENCES_KEY_PREFIX, session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::path::PathBuf;
    use tutordesk_privacy::PrivacyError;
    use tutordesk_scheduling::{CalendarView, Student, TutoringSession};

    fn test_desk(db: Database) -> Desk {
        let config = Config::new(PathBuf::from("/tmp/tutordesk-test"));
        let desk = Desk::with_database(config, db);
        desk.initialize().unwrap();
        desk
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_views_require_open_session() {
        let desk = test_desk(Database::open_in_memory().unwrap());

        let err = desk.student_cards("tutor-1").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Privacy(PrivacyError::NotInitialized(ref id)) if id == "tutor-1"
        ));
        assert!(desk.preferences("tutor-1").is_err());
        assert!(desk
            .update_preference("tutor-1", FieldKind::Phone, MaskLevel::None)
            .is_err());
    }

    #[test]
    fn test_cards_are_masked_per_session() {
        let desk = test_desk(Database::open_in_memory().unwrap());
        desk.book()
            .create(TutoringSession::new(
                "Alex Johnson",
                "Mathematics",
                monday().and_hms_opt(15, 0, 0).unwrap(),
                60,
            ))
            .unwrap();

        desk.open_session("tutor-1").unwrap();
        desk.open_session("admin").unwrap();
        desk.update_preference("admin", FieldKind::FirstName, MaskLevel::None)
            .unwrap();
        desk.update_preference("admin", FieldKind::LastName, MaskLevel::None)
            .unwrap();

        let tutor_view = desk.session_cards_for_day("tutor-1", monday()).unwrap();
        let admin_view = desk.session_cards_for_day("admin", monday()).unwrap();

        assert_eq!(tutor_view[0].student, "A*** J***");
        assert_eq!(admin_view[0].student, "Alex Johnson");

        let upcoming = desk
            .upcoming_cards("tutor-1", monday().and_hms_opt(9, 0, 0).unwrap())
            .unwrap();
        assert_eq!(upcoming.len(), 1);
    }

    #[test]
    fn test_student_cards() {
        let desk = test_desk(Database::open_in_memory().unwrap());
        desk.roster()
            .add(
                Student::new("Emma", "Wilson")
                    .unwrap()
                    .with_phone("5559876543")
                    .with_email("emma.w@example.com"),
            )
            .unwrap();

        desk.open_session("tutor-1").unwrap();
        let cards = desk.student_cards("tutor-1").unwrap();

        assert_eq!(cards[0].first_name, "E***");
        assert_eq!(cards[0].phone, "**********");
        assert_eq!(cards[0].email, "e***@example.com");

        // Stored record stays raw
        let stored = desk.roster().list();
        assert_eq!(stored[0].phone, "5559876543");
    }

    #[test]
    fn test_preferences_persist_across_sessions() {
        let db = Database::open_in_memory().unwrap();
        let desk = test_desk(db.clone());

        desk.open_session("tutor-1").unwrap();
        desk.update_preference("tutor-1", FieldKind::Phone, MaskLevel::Partial)
            .unwrap();
        desk.close_session("tutor-1").unwrap();
        assert!(desk.preferences("tutor-1").is_err());

        let restarted = test_desk(db);
        let store = restarted.open_session("tutor-1").unwrap();
        assert_eq!(store.level(&FieldKind::Phone), MaskLevel::Partial);

        // Other users still start from the defaults
        let other = restarted.open_session("tutor-2").unwrap();
        assert_eq!(other.level(&FieldKind::Phone), MaskLevel::Full);
    }

    #[test]
    fn test_preferences_not_persisted_when_disabled() {
        let db = Database::open_in_memory().unwrap();
        let mut config = Config::new(PathBuf::from("/tmp/tutordesk-test"));
        config.persist_preferences = false;
        let desk = Desk::with_database(config, db.clone());

        desk.open_session("tutor-1").unwrap();
        desk.update_preference("tutor-1", FieldKind::Email, MaskLevel::None)
            .unwrap();
        desk.close_session("tutor-1").unwrap();

        assert_eq!(db.get_setting("mask_preferences:tutor-1").unwrap(), None);
    }

    #[test]
    fn test_unreadable_saved_preferences_fall_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("mask_preferences:tutor-1", "{\"phone\": \"blurred\"}")
            .unwrap();

        let desk = test_desk(db);
        let store = desk.open_session("tutor-1").unwrap();
        assert_eq!(store.get_preferences(), PreferenceSet::default());
    }

    #[test]
    fn test_settings_rows_and_time_slots() {
        let desk = test_desk(Database::open_in_memory().unwrap());
        desk.open_session("tutor-1").unwrap();

        let rows = desk.settings_rows("tutor-1").unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].label, "First Name");

        assert_eq!(desk.time_slots().len(), 13);
    }

    #[test]
    fn test_failed_save_leaves_preferences_unchanged() {
        let db = Database::open_in_memory().unwrap();
        let desk = test_desk(db.clone());
        let store = desk.open_session("tutor-1").unwrap();

        db.with_connection(|conn| {
            conn.execute("DROP TABLE settings", [])?;
            Ok(())
        })
        .unwrap();

        assert!(desk
            .update_preference("tutor-1", FieldKind::Phone, MaskLevel::None)
            .is_err());
        assert_eq!(store.level(&FieldKind::Phone), MaskLevel::Full);

        let reveal_all = PreferenceSet::default().with(FieldKind::Email, MaskLevel::None);
        assert!(desk.set_preferences("tutor-1", reveal_all).is_err());
        assert_eq!(store.level(&FieldKind::Email), MaskLevel::Partial);
    }

    #[test]
    fn test_reopening_session_keeps_live_store() {
        let db = Database::open_in_memory().unwrap();
        let mut config = Config::new(PathBuf::from("/tmp/tutordesk-test"));
        config.persist_preferences = false;
        let desk = Desk::with_database(config, db);

        desk.open_session("tutor-1").unwrap();
        desk.update_preference("tutor-1", FieldKind::Address, MaskLevel::Partial)
            .unwrap();

        let reopened = desk.open_session("tutor-1").unwrap();
        assert_eq!(reopened.level(&FieldKind::Address), MaskLevel::Partial);

        // Both handles share one store
        reopened.update_preference(FieldKind::Phone, MaskLevel::None);
        assert_eq!(
            desk.preferences("tutor-1").unwrap().level(&FieldKind::Phone),
            MaskLevel::None
        );
    }

    #[test]
    fn test_calendar_uses_configured_view() {
        let desk = test_desk(Database::open_in_memory().unwrap());
        assert_eq!(desk.calendar(monday()).view, CalendarView::Week);
        assert_eq!(desk.calendar(monday()).visible_days().len(), 7);

        let mut config = Config::new(PathBuf::from("/tmp/tutordesk-test"));
        config.default_view = CalendarView::Month;
        let desk = Desk::with_database(config, Database::open_in_memory().unwrap());
        let calendar = desk.calendar(monday());
        assert_eq!(calendar.view, CalendarView::Month);
        assert_eq!(calendar.visible_days().len(), 31);
    }
}
