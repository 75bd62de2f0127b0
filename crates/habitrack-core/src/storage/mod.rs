mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LogConfig, StorageConfig};
pub use database::HabitDb;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{ConfigError, Result};
use crate::habit::Habit;
use crate::streaks::{Segment, StreakSummary};

/// Returns the data directory for the database and config file.
///
/// `HABITRACK_HOME` wins when set. Otherwise `~/.config/habitrack[-dev]/`,
/// with HABITRACK_ENV=dev selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HABITRACK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitrack-dev")
            } else {
                base_dir.join("habitrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Persistence the tracker needs for habits, check-ins and segments.
pub trait HabitStore {
    /// Insert a habit unless one with the same name exists.
    ///
    /// Returns `false` when the name was taken; the stored habit is untouched.
    fn insert_habit(&self, habit: &Habit) -> Result<bool>;

    fn get_habit(&self, name: &str) -> Result<Option<Habit>>;

    /// All habits in creation order.
    fn list_habits(&self) -> Result<Vec<Habit>>;

    /// Check-in dates of a habit, ascending and distinct.
    fn list_checkins(&self, name: &str) -> Result<Vec<NaiveDate>>;

    /// Insert check-ins. Dates already present are skipped.
    fn insert_checkins(&self, name: &str, dates: &[NaiveDate]) -> Result<()>;

    /// Discard the habit's stored segments and store `segments` in their place.
    fn replace_segments(&self, name: &str, segments: &[Segment]) -> Result<()>;

    /// Stored segments of a habit, ordered by start date.
    fn list_segments(&self, name: &str) -> Result<Vec<Segment>>;

    fn update_cached_streaks(&self, name: &str, summary: &StreakSummary) -> Result<()>;

    /// Delete a habit with its check-ins and segments. Returns whether it existed.
    fn delete_habit(&self, name: &str) -> Result<bool>;

    /// Remove every habit, check-in and segment.
    fn clear_all(&self) -> Result<()>;

    /// Run `f` as one unit of work. Stores without transactions just call it.
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T>,
    {
        f(self)
    }
}
