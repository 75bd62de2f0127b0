//! Core error types for habitrack-core.
//!
//! This module defines the error hierarchy using thiserror so that callers
//! (the CLI, tests) can match on the failure kind instead of parsing messages.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors, including unknown periodicities
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Requested check-in range lies outside the habit's lifetime
    #[error(
        "The time frame {start} to {end} is not within the habit creation date ({created}) and today ({today})"
    )]
    RangeValidation {
        start: NaiveDate,
        end: NaiveDate,
        created: NaiveDate,
        today: NaiveDate,
    },

    /// Operation on a habit that is not in the store
    #[error("No habit found with the name '{name}'")]
    NotFound { name: String },

    /// A habit with the same name already exists; the stored one is kept
    #[error("A habit named '{name}' already exists")]
    Constraint { name: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be decoded
    #[error("Corrupt value in column '{column}': {value}")]
    CorruptValue { column: String, value: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Periodicity other than daily or weekly
    #[error("Invalid periodicity: {0}")]
    UnknownPeriodicity(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required habit field is empty
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// Priority outside 1..=10
    #[error("Priority must be between 1 and 10, got {0}")]
    PriorityOutOfRange(i64),

    /// Check-in range whose start lies after its end
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// Unknown predefined habit key
    #[error("'{key}' is not one of the predefined habits: {known}")]
    UnknownPredefined { key: String, known: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked
                    || code.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rusqlite_errors_become_query_failures() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::QueryFailed(_))
        ));
    }

    #[test]
    fn range_error_names_both_bounds() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 8, d).unwrap();
        let err = CoreError::RangeValidation {
            start: day(1),
            end: day(3),
            created: day(12),
            today: day(20),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-08-01"));
        assert!(msg.contains("2024-08-12"));
    }
}
