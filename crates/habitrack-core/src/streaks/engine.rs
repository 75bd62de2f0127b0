//! Full-history segmentation of a habit's check-ins.

use chrono::NaiveDate;

use super::{Segment, SegmentKind};
use crate::calendar::{align, shift, steps_between};
use crate::habit::Periodicity;

/// Run being accumulated while walking consecutive check-ins.
struct Run {
    kind: SegmentKind,
    start: NaiveDate,
    length: u32,
}

impl Run {
    /// Two consecutive checks open a streak of length 2.
    fn streak_from(start: NaiveDate) -> Self {
        Self {
            kind: SegmentKind::Streak,
            start,
            length: 2,
        }
    }

    fn gap_from(start: NaiveDate, missed: u32) -> Self {
        Self {
            kind: SegmentKind::Break,
            start,
            length: missed,
        }
    }

    fn close(self, end: NaiveDate) -> Segment {
        Segment {
            kind: self.kind,
            start: self.start,
            end,
            length: self.length,
        }
    }
}

fn count(steps: i64) -> u32 {
    u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
}

/// Segment a habit's history into streaks and breaks.
///
/// `checkins` must be ascending and lie within `[created_on, today]`; callers
/// validate that before writing check-ins. Dates are aligned to the cadence
/// here, and duplicates produced by alignment collapse into one check-in.
///
/// The result is chronological and contiguous, covering
/// `[align(created_on), align(today)]`. The one exception is a history with a
/// single check-in, which always yields exactly one streak of length 1.
/// A check-in with gaps on both sides never forms a streak of its own; its
/// period sits inside the surrounding break without adding to its length.
/// Today's period is still open, so it is never counted as missed.
pub fn segment(
    checkins: &[NaiveDate],
    created_on: NaiveDate,
    periodicity: Periodicity,
    today: NaiveDate,
) -> Vec<Segment> {
    let created = align(created_on, periodicity);
    let today = align(today, periodicity);

    let mut dates: Vec<NaiveDate> = checkins.iter().map(|d| align(*d, periodicity)).collect();
    dates.dedup();

    let (first, last) = match dates.as_slice() {
        [] => {
            if created >= today {
                return Vec::new();
            }
            let missed = count(steps_between(created, today, periodicity));
            return vec![Segment::gap(created, today, missed)];
        }
        [only] => return vec![Segment::streak(*only, *only, 1)],
        [first, .., last] => (*first, *last),
    };

    let mut segments = Vec::new();

    if created < first {
        segments.push(Segment::gap(
            created,
            shift(first, -1, periodicity),
            count(steps_between(created, first, periodicity)),
        ));
    }

    let mut open: Option<Run> = None;
    for pair in dates.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let steps = steps_between(prev, curr, periodicity);

        if steps == 1 {
            open = match open.take() {
                Some(mut run) if run.kind == SegmentKind::Streak => {
                    run.length += 1;
                    Some(run)
                }
                Some(run) => {
                    segments.push(run.close(shift(prev, -1, periodicity)));
                    Some(Run::streak_from(prev))
                }
                None => Some(Run::streak_from(prev)),
            };
        } else {
            let missed = count(steps - 1);
            open = match open.take() {
                Some(run) if run.kind == SegmentKind::Streak => {
                    segments.push(run.close(prev));
                    Some(Run::gap_from(shift(prev, 1, periodicity), missed))
                }
                Some(mut run) => {
                    run.length += missed;
                    Some(run)
                }
                // isolated first check-in: the break absorbs its period
                None => Some(Run::gap_from(prev, missed)),
            };
        }
    }

    if let Some(run) = open {
        segments.push(run.close(last));
    }

    if today > last {
        segments.push(Segment::gap(
            shift(last, 1, periodicity),
            today,
            count(steps_between(last, today, periodicity) - 1),
        ));
    }

    segments
}
