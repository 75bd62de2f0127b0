//! Streak and break segmentation.
//!
//! A habit's check-in history is turned into an ordered, contiguous list of
//! [`Segment`]s by [`segment`]; the reducers read figures back out of it.

mod engine;
mod reducers;

pub use engine::segment;
pub use reducers::{current_streak, longest, summarize, StreakSummary};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DatabaseError, Result};

/// Label of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Consecutive on-cadence check-ins
    Streak,
    /// Missed cadence periods
    Break,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Streak => "streak",
            SegmentKind::Break => "break",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentKind {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "streak" => Ok(SegmentKind::Streak),
            "break" => Ok(SegmentKind::Break),
            other => Err(DatabaseError::CorruptValue {
                column: "kind".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// A labeled span of cadence periods, both ends aligned and inclusive.
///
/// `length` counts check-ins for a streak and missed periods for a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

impl Segment {
    pub fn streak(start: NaiveDate, end: NaiveDate, length: u32) -> Self {
        Self {
            kind: SegmentKind::Streak,
            start,
            end,
            length,
        }
    }

    pub fn gap(start: NaiveDate, end: NaiveDate, length: u32) -> Self {
        Self {
            kind: SegmentKind::Break,
            start,
            end,
            length,
        }
    }

    pub fn is_streak(&self) -> bool {
        self.kind == SegmentKind::Streak
    }
}
