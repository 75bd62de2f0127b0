//! Database schema migrations for habitrack.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    match conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: habits, their check-ins and derived segments.
///
/// Check-ins are unique per habit and aligned date. Both child tables follow
/// the habit on rename and delete.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            name            TEXT PRIMARY KEY,
            description     TEXT NOT NULL,
            priority        INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 10),
            periodicity     TEXT NOT NULL,
            current_streak  INTEGER NOT NULL DEFAULT 0,
            longest_streak  INTEGER NOT NULL DEFAULT 0,
            longest_break   INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS checkins (
            habit_name  TEXT NOT NULL
                        REFERENCES habits(name) ON UPDATE CASCADE ON DELETE CASCADE,
            date        TEXT NOT NULL,
            checked_at  TEXT NOT NULL,
            UNIQUE (habit_name, date)
        );

        CREATE TABLE IF NOT EXISTS segments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_name  TEXT NOT NULL
                        REFERENCES habits(name) ON UPDATE CASCADE ON DELETE CASCADE,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            kind        TEXT NOT NULL,
            length      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_habit_date ON checkins(habit_name, date);
        CREATE INDEX IF NOT EXISTS idx_segments_habit_start ON segments(habit_name, start_date);",
    )?;

    set_schema_version(&tx, 1)?;

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn priority_check_constraint_is_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO habits (name, description, priority, periodicity, created_at)
             VALUES ('x', 'y', 11, 'DAILY', '2024-08-12 00:00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
