//! SQLite-based storage for habits, check-ins and segments.
//!
//! Provides persistent storage for:
//! - Habit definitions and their cached streak figures
//! - Check-ins, one row per habit and aligned date
//! - The derived streak/break segments, replaced wholesale on every refresh

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations, HabitStore};
use crate::error::{CoreError, DatabaseError, Result};
use crate::habit::{Habit, Periodicity};
use crate::streaks::{Segment, SegmentKind, StreakSummary};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// === Helper Functions ===

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str, column: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| corrupt(column, value))
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(value: &str, column: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| corrupt(column, value))
}

fn parse_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| corrupt(column, &value.to_string()))
}

fn corrupt(column: &str, value: &str) -> CoreError {
    DatabaseError::CorruptValue {
        column: column.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Raw `habits` row, decoded into a [`Habit`] outside the rusqlite closure so
/// that an unknown periodicity surfaces as a configuration error.
struct HabitRow {
    name: String,
    description: String,
    priority: i64,
    periodicity: String,
    current_streak: i64,
    longest_streak: i64,
    longest_break: i64,
    created_at: String,
}

impl HabitRow {
    const COLUMNS: &'static str = "name, description, priority, periodicity, current_streak, \
                                   longest_streak, longest_break, created_at";

    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(0)?,
            description: row.get(1)?,
            priority: row.get(2)?,
            periodicity: row.get(3)?,
            current_streak: row.get(4)?,
            longest_streak: row.get(5)?,
            longest_break: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_habit(self) -> Result<Habit> {
        Ok(Habit {
            periodicity: self.periodicity.parse::<Periodicity>()?,
            created_at: parse_datetime(&self.created_at, "created_at")?,
            current_streak: parse_count(self.current_streak, "current_streak")?,
            longest_streak: parse_count(self.longest_streak, "longest_streak")?,
            longest_break: parse_count(self.longest_break, "longest_break")?,
            name: self.name,
            description: self.description,
            priority: self.priority,
        })
    }
}

/// SQLite database for habit storage.
///
/// Each instance owns its connection; open one per process or request and
/// pass it to [`crate::HabitTracker`].
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/habitrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("habitrack.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self::with_connection(conn)?;
        tracing::debug!(path = %path.display(), "opened habit database");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Run `f` inside `BEGIN IMMEDIATE`, or directly when a transaction is
    /// already open on this connection.
    fn in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.conn.is_autocommit() {
            return f();
        }

        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK;") {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl HabitStore for HabitDb {
    fn insert_habit(&self, habit: &Habit) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO habits
                (name, description, priority, periodicity,
                 current_streak, longest_streak, longest_break, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.name,
                habit.description,
                habit.priority,
                habit.periodicity.as_str(),
                habit.current_streak,
                habit.longest_streak,
                habit.longest_break,
                format_datetime(habit.created_at),
            ],
        )?;
        Ok(inserted == 1)
    }

    fn get_habit(&self, name: &str) -> Result<Option<Habit>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE name = ?1", HabitRow::COLUMNS),
                params![name],
                HabitRow::from_row,
            )
            .optional()?;
        row.map(HabitRow::into_habit).transpose()
    }

    fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM habits ORDER BY rowid ASC",
            HabitRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], HabitRow::from_row)?;

        let mut habits = Vec::new();
        for row in rows {
            habits.push(row?.into_habit()?);
        }
        Ok(habits)
    }

    fn list_checkins(&self, name: &str) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT date FROM checkins WHERE habit_name = ?1 ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![name], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(parse_date(&row?, "date")?);
        }
        Ok(dates)
    }

    fn insert_checkins(&self, name: &str, dates: &[NaiveDate]) -> Result<()> {
        let checked_at = format_datetime(Local::now().naive_local());
        self.in_transaction(|| {
            let mut stmt = self.conn.prepare(
                "INSERT OR IGNORE INTO checkins (habit_name, date, checked_at)
                 VALUES (?1, ?2, ?3)",
            )?;
            for date in dates {
                stmt.execute(params![name, format_date(*date), checked_at])?;
            }
            Ok(())
        })
    }

    fn replace_segments(&self, name: &str, segments: &[Segment]) -> Result<()> {
        self.in_transaction(|| {
            self.conn
                .execute("DELETE FROM segments WHERE habit_name = ?1", params![name])?;
            let mut stmt = self.conn.prepare(
                "INSERT INTO segments (habit_name, start_date, end_date, kind, length)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for segment in segments {
                stmt.execute(params![
                    name,
                    format_date(segment.start),
                    format_date(segment.end),
                    segment.kind.as_str(),
                    segment.length,
                ])?;
            }
            Ok(())
        })
    }

    fn list_segments(&self, name: &str) -> Result<Vec<Segment>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_date, end_date, kind, length
             FROM segments
             WHERE habit_name = ?1
             ORDER BY start_date ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut segments = Vec::new();
        for row in rows {
            let (start, end, kind, length) = row?;
            segments.push(Segment {
                kind: kind.parse::<SegmentKind>()?,
                start: parse_date(&start, "start_date")?,
                end: parse_date(&end, "end_date")?,
                length: parse_count(length, "length")?,
            });
        }
        Ok(segments)
    }

    fn update_cached_streaks(&self, name: &str, summary: &StreakSummary) -> Result<()> {
        self.conn.execute(
            "UPDATE habits
             SET current_streak = ?1, longest_streak = ?2, longest_break = ?3
             WHERE name = ?4",
            params![
                summary.current,
                summary.longest_streak,
                summary.longest_break,
                name
            ],
        )?;
        Ok(())
    }

    fn delete_habit(&self, name: &str) -> Result<bool> {
        self.in_transaction(|| {
            self.conn
                .execute("DELETE FROM checkins WHERE habit_name = ?1", params![name])?;
            self.conn
                .execute("DELETE FROM segments WHERE habit_name = ?1", params![name])?;
            let deleted = self
                .conn
                .execute("DELETE FROM habits WHERE name = ?1", params![name])?;
            Ok(deleted == 1)
        })
    }

    fn clear_all(&self) -> Result<()> {
        self.in_transaction(|| {
            self.conn.execute_batch(
                "DELETE FROM segments;
                 DELETE FROM checkins;
                 DELETE FROM habits;",
            )?;
            Ok(())
        })
    }

    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.in_transaction(|| f(self))
    }
}
