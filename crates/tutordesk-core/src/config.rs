//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tutordesk_scheduling::CalendarView;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Save each user's mask preferences in the settings table
    pub persist_preferences: bool,
    /// First hourly slot of the day and week views
    pub day_start_hour: u32,
    /// Last hourly slot of the day and week views
    pub day_end_hour: u32,
    /// View the calendar opens in
    pub default_view: CalendarView,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tutordesk.db"),
            persist_preferences: true,
            day_start_hour: 8,
            day_end_hour: 20,
            default_view: CalendarView::Week,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("TutorDesk"))
            .unwrap_or_else(|| PathBuf::from(".tutordesk"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = Config::new(PathBuf::from("/tmp/tutordesk"));

        assert_eq!(config.database_path, PathBuf::from("/tmp/tutordesk/tutordesk.db"));
        assert!(config.persist_preferences);
        assert_eq!((config.day_start_hour, config.day_end_hour), (8, 20));
        assert_eq!(config.default_view, CalendarView::Week);
    }
}
