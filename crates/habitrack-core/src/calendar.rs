//! Cadence alignment for calendar dates.
//!
//! Every comparison the segmentation engine makes happens between aligned
//! dates, so a single cadence step is always 1 day (daily) or 7 days (weekly).

use chrono::{Datelike, Duration, NaiveDate};

use crate::habit::Periodicity;

/// Map a date onto its cadence period's representative.
///
/// Daily dates are returned unchanged; weekly dates move back to the Monday
/// of their ISO week.
pub fn align(date: NaiveDate, periodicity: Periodicity) -> NaiveDate {
    match periodicity {
        Periodicity::Daily => date,
        Periodicity::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
    }
}

/// Length of one cadence step in days.
pub fn step_days(periodicity: Periodicity) -> i64 {
    match periodicity {
        Periodicity::Daily => 1,
        Periodicity::Weekly => 7,
    }
}

/// Whole cadence steps from `from` to `to`. Negative when `to` is earlier.
pub fn steps_between(from: NaiveDate, to: NaiveDate, periodicity: Periodicity) -> i64 {
    let days = (align(to, periodicity) - align(from, periodicity)).num_days();
    days / step_days(periodicity)
}

/// Move an aligned date by `steps` cadence periods.
pub fn shift(date: NaiveDate, steps: i64, periodicity: Periodicity) -> NaiveDate {
    date + Duration::days(steps * step_days(periodicity))
}

/// Aligned dates of every period in `[start, end]`, inclusive.
///
/// Yields nothing when `end` aligns before `start`.
pub fn periods(
    start: NaiveDate,
    end: NaiveDate,
    periodicity: Periodicity,
) -> impl Iterator<Item = NaiveDate> {
    let first = align(start, periodicity);
    let count = steps_between(first, end, periodicity) + 1;
    (0..count.max(0)).map(move |n| shift(first, n, periodicity))
}
