use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Segment, SegmentKind};
use crate::calendar::align;
use crate::habit::Periodicity;

/// Cached streak figures of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest_streak: u32,
    pub longest_break: u32,
}

/// Length of the streak ending in today's period, or 0.
pub fn current_streak(segments: &[Segment], today: NaiveDate, periodicity: Periodicity) -> u32 {
    let today = align(today, periodicity);
    segments
        .iter()
        .find(|s| s.is_streak() && s.end == today)
        .map(|s| s.length)
        .unwrap_or(0)
}

/// Largest length among segments of `kind`, or 0 when there are none.
pub fn longest(segments: &[Segment], kind: SegmentKind) -> u32 {
    segments
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.length)
        .max()
        .unwrap_or(0)
}

pub fn summarize(segments: &[Segment], today: NaiveDate, periodicity: Periodicity) -> StreakSummary {
    StreakSummary {
        current: current_streak(segments, today, periodicity),
        longest_streak: longest(segments, SegmentKind::Streak),
        longest_break: longest(segments, SegmentKind::Break),
    }
}
