//! Habit records and their construction rules.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError, Result, ValidationError};

pub const MIN_PRIORITY: i64 = 1;
pub const MAX_PRIORITY: i64 = 10;

/// Recurrence unit of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Periodicity {
    Daily,
    Weekly,
}

impl Periodicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "DAILY",
            Periodicity::Weekly => "WEEKLY",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Periodicity::Daily),
            "WEEKLY" => Ok(Periodicity::Weekly),
            _ => Err(ConfigError::UnknownPeriodicity(s.to_string()).into()),
        }
    }
}

/// User input for a new habit, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub description: String,
    pub priority: i64,
    pub periodicity: Periodicity,
}

impl NewHabit {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        priority: i64,
        periodicity: Periodicity,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            priority,
            periodicity,
        }
    }

    /// Reject empty fields and priorities outside 1..=10.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(ValidationError::PriorityOutOfRange(self.priority));
        }
        Ok(())
    }
}

/// A tracked habit together with its cached streak figures.
///
/// The three cached fields are written only from the output of
/// [`crate::streaks::segment`] via [`crate::streaks::summarize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub description: String,
    pub priority: i64,
    pub periodicity: Periodicity,
    pub created_at: NaiveDateTime,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub longest_break: u32,
}

impl Habit {
    /// Build a habit from validated input. Cached streaks start at zero.
    pub fn create(input: NewHabit, created_at: NaiveDateTime) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            name: input.name,
            description: input.description,
            priority: input.priority,
            periodicity: input.periodicity,
            created_at,
            current_streak: 0,
            longest_streak: 0,
            longest_break: 0,
        })
    }

    /// Creation timestamp with the time of day dropped.
    pub fn creation_date(&self) -> NaiveDate {
        self.created_at.date()
    }
}
