//! Habit operations on top of a [`HabitStore`].
//!
//! Every write that touches check-ins is followed by a full recomputation of
//! the habit's segments and cached streaks, inside one unit of work:
//! insert check-ins, segment the whole history, replace stored segments,
//! update the cached figures.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{align, periods};
use crate::error::{CoreError, Result, ValidationError};
use crate::habit::{Habit, NewHabit};
use crate::seed::{self, Predefined};
use crate::storage::HabitStore;
use crate::streaks::{segment, summarize, Segment};

/// Inclusive range of dates to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }
}

/// Service owning the store handle.
pub struct HabitTracker<S: HabitStore> {
    store: S,
}

impl<S: HabitStore> HabitTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate and store a new habit.
    ///
    /// # Errors
    /// `Validation` for bad input, `Constraint` when the name is taken (the
    /// existing habit is left as it was).
    pub fn create_habit(&self, input: NewHabit, created_at: NaiveDateTime) -> Result<Habit> {
        let habit = Habit::create(input, created_at)?;
        if !self.store.insert_habit(&habit)? {
            return Err(CoreError::Constraint { name: habit.name });
        }
        tracing::info!(habit = %habit.name, periodicity = %habit.periodicity, "created habit");
        Ok(habit)
    }

    pub fn habit(&self, name: &str) -> Result<Habit> {
        self.store
            .get_habit(name)?
            .ok_or_else(|| CoreError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn habits(&self) -> Result<Vec<Habit>> {
        self.store.list_habits()
    }

    pub fn segments(&self, name: &str) -> Result<Vec<Segment>> {
        self.habit(name)?;
        self.store.list_segments(name)
    }

    /// Delete a habit with its check-ins and segments.
    pub fn delete_habit(&self, name: &str) -> Result<()> {
        if !self.store.delete_habit(name)? {
            return Err(CoreError::NotFound {
                name: name.to_string(),
            });
        }
        tracing::info!(habit = name, "deleted habit");
        Ok(())
    }

    /// Check a habit off for every period in `range` (today when `None`).
    ///
    /// The range must lie within the habit's creation period and today's
    /// period. Periods already checked are left alone.
    ///
    /// # Errors
    /// `NotFound` for an unknown habit, `RangeValidation` for a range outside
    /// the habit's lifetime. Nothing is written in either case.
    pub fn check(&self, name: &str, range: Option<DateRange>, today: NaiveDate) -> Result<Habit> {
        let habit = self.habit(name)?;
        let range = range.unwrap_or_else(|| DateRange::single(today));
        let periodicity = habit.periodicity;

        let created = habit.creation_date();
        if align(range.start, periodicity) < align(created, periodicity)
            || align(range.end, periodicity) > align(today, periodicity)
        {
            return Err(CoreError::RangeValidation {
                start: range.start,
                end: range.end,
                created,
                today,
            });
        }

        let dates: Vec<NaiveDate> = periods(range.start, range.end, periodicity).collect();
        tracing::info!(
            habit = name,
            start = %range.start,
            end = %range.end,
            periods = dates.len(),
            "checking habit"
        );

        self.store.atomically(|store| {
            store.insert_checkins(name, &dates)?;
            Self::recompute(store, &habit, today)
        })
    }

    /// Recompute segments and cached streaks as of `today` without checking.
    pub fn refresh(&self, name: &str, today: NaiveDate) -> Result<Habit> {
        let habit = self.habit(name)?;
        self.store
            .atomically(|store| Self::recompute(store, &habit, today))
    }

    /// [`Self::refresh`] for every stored habit.
    pub fn refresh_all(&self, today: NaiveDate) -> Result<Vec<Habit>> {
        let habits = self.store.list_habits()?;
        self.store.atomically(|store| {
            habits
                .iter()
                .map(|habit| Self::recompute(store, habit, today))
                .collect()
        })
    }

    /// Add one of the built-in habits together with its recorded history.
    ///
    /// # Errors
    /// `Validation` for an unknown key, `Constraint` when a habit with the
    /// same name already exists.
    pub fn add_predefined(&self, key: &str, today: NaiveDate) -> Result<Habit> {
        let seed: &Predefined = seed::find(key)?;
        let created_at = Predefined::created_on().and_time(chrono::NaiveTime::MIN);
        let habit = Habit::create(seed.new_habit(), created_at)?;

        let dates: Vec<NaiveDate> = seed
            .checkin_dates()
            .into_iter()
            .filter(|d| *d <= today)
            .map(|d| align(d, habit.periodicity))
            .collect();

        self.store.atomically(|store| {
            if !store.insert_habit(&habit)? {
                return Err(CoreError::Constraint {
                    name: habit.name.clone(),
                });
            }
            store.insert_checkins(&habit.name, &dates)?;
            Self::recompute(store, &habit, today)
        })
    }

    /// Remove every habit, check-in and segment.
    pub fn clear(&self) -> Result<()> {
        self.store.clear_all()?;
        tracing::info!("cleared all habits");
        Ok(())
    }

    fn recompute(store: &S, habit: &Habit, today: NaiveDate) -> Result<Habit> {
        let checkins = store.list_checkins(&habit.name)?;
        let segments = segment(&checkins, habit.creation_date(), habit.periodicity, today);
        let summary = summarize(&segments, today, habit.periodicity);
        tracing::debug!(
            habit = %habit.name,
            checkins = checkins.len(),
            segments = segments.len(),
            current = summary.current,
            longest_streak = summary.longest_streak,
            longest_break = summary.longest_break,
            "recomputed segments"
        );

        store.replace_segments(&habit.name, &segments)?;
        store.update_cached_streaks(&habit.name, &summary)?;

        Ok(Habit {
            current_streak: summary.current,
            longest_streak: summary.longest_streak,
            longest_break: summary.longest_break,
            ..habit.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Periodicity;
    use crate::storage::HabitDb;
    use crate::streaks::SegmentKind;

    fn aug(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn tracker_with(name: &str, periodicity: Periodicity, created: NaiveDate) -> HabitTracker<HabitDb> {
        let tracker = HabitTracker::new(HabitDb::open_memory().unwrap());
        tracker
            .create_habit(
                NewHabit::new(name, "Test Description", 5, periodicity),
                created.and_hms_opt(18, 0, 0).unwrap(),
            )
            .unwrap();
        tracker
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            DateRange::new(aug(14), aug(12)),
            Err(ValidationError::InvertedRange { .. })
        ));
        assert_eq!(DateRange::new(aug(12), aug(12)).unwrap(), DateRange::single(aug(12)));
    }

    #[test]
    fn check_defaults_to_today() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let habit = tracker.check("reading", None, aug(14)).unwrap();
        assert_eq!(tracker.store().list_checkins("reading").unwrap(), vec![aug(14)]);
        assert_eq!(habit.current_streak, 1);
        assert_eq!(habit.longest_streak, 1);
    }

    #[test]
    fn check_range_builds_current_streak() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let range = DateRange::new(aug(12), aug(15)).unwrap();
        let habit = tracker.check("reading", Some(range), aug(15)).unwrap();
        assert_eq!(habit.current_streak, 4);
        assert_eq!(habit.longest_streak, 4);
        assert_eq!(habit.longest_break, 0);

        let stored = tracker.habit("reading").unwrap();
        assert_eq!(stored, habit);
    }

    #[test]
    fn range_before_creation_is_rejected_without_writes() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let range = DateRange::new(aug(10), aug(13)).unwrap();
        let err = tracker.check("reading", Some(range), aug(20)).unwrap_err();
        assert!(matches!(err, CoreError::RangeValidation { .. }));
        assert!(tracker.store().list_checkins("reading").unwrap().is_empty());
    }

    #[test]
    fn range_after_today_is_rejected() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let range = DateRange::new(aug(13), aug(21)).unwrap();
        let err = tracker.check("reading", Some(range), aug(20)).unwrap_err();
        assert!(matches!(err, CoreError::RangeValidation { .. }));
    }

    #[test]
    fn weekly_range_compares_aligned_weeks() {
        // created Thursday 08-15, the range starts Monday of that week
        let tracker = tracker_with("workout", Periodicity::Weekly, aug(15));
        let range = DateRange::new(aug(12), aug(27)).unwrap();
        let habit = tracker.check("workout", Some(range), aug(28)).unwrap();
        assert_eq!(
            tracker.store().list_checkins("workout").unwrap(),
            vec![aug(12), aug(19), aug(26)]
        );
        assert_eq!(habit.current_streak, 3);
    }

    #[test]
    fn repeated_check_is_a_noop() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        tracker.check("reading", None, aug(12)).unwrap();
        let habit = tracker.check("reading", None, aug(12)).unwrap();
        assert_eq!(tracker.store().list_checkins("reading").unwrap().len(), 1);
        assert_eq!(habit.current_streak, 1);
    }

    #[test]
    fn unknown_habit_is_not_found() {
        let tracker = HabitTracker::new(HabitDb::open_memory().unwrap());
        assert!(matches!(
            tracker.check("ghost", None, aug(12)),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(tracker.delete_habit("ghost"), Err(CoreError::NotFound { .. })));
        assert!(matches!(tracker.refresh("ghost", aug(12)), Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn duplicate_name_is_a_constraint_violation() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let err = tracker
            .create_habit(
                NewHabit::new("reading", "other", 9, Periodicity::Weekly),
                aug(13).and_hms_opt(8, 0, 0).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Constraint { .. }));
        assert_eq!(tracker.habit("reading").unwrap().priority, 5);
    }

    #[test]
    fn refresh_of_new_habit_in_same_period_is_empty() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        tracker.refresh("reading", aug(12)).unwrap();
        assert!(tracker.segments("reading").unwrap().is_empty());
    }

    #[test]
    fn refresh_reports_break_since_creation() {
        let tracker = tracker_with("reading", Periodicity::Daily, aug(12));
        let habit = tracker.refresh("reading", aug(16)).unwrap();
        assert_eq!(habit.longest_break, 4);
        let segments = tracker.segments("reading").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Break);
    }

    #[test]
    fn predefined_cannot_be_added_twice() {
        let tracker = HabitTracker::new(HabitDb::open_memory().unwrap());
        tracker.add_predefined("reading", aug(31)).unwrap();
        assert!(matches!(
            tracker.add_predefined("Reading", aug(31)),
            Err(CoreError::Constraint { .. })
        ));
        assert!(matches!(
            tracker.add_predefined("jogging", aug(31)),
            Err(CoreError::Validation(_))
        ));
    }
}
