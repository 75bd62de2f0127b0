//! Integration tests for the habit tracker over SQLite.
//!
//! Covers the check-in → recompute → persist workflow, predefined habits and
//! the analysis helpers on stored data.

use chrono::NaiveDate;
use habitrack_core::analysis::{self, HabitAttribute, SortOrder};
use habitrack_core::{
    CoreError, DateRange, HabitDb, HabitStore, HabitTracker, NewHabit, Periodicity, SegmentKind,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn tracker() -> HabitTracker<HabitDb> {
    HabitTracker::new(HabitDb::open_memory().unwrap())
}

#[test]
fn test_meditate_history_as_of_september_tenth() {
    let tracker = tracker();
    let habit = tracker.add_predefined("meditate", date(9, 10)).unwrap();

    assert_eq!(habit.current_streak, 0);
    assert_eq!(habit.longest_streak, 3);
    assert_eq!(habit.longest_break, 9);

    let segments = tracker.segments("meditate").unwrap();
    let streaks: Vec<u32> = segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Streak)
        .map(|s| s.length)
        .collect();
    assert_eq!(streaks, vec![2, 3, 3]);

    let last = segments.last().unwrap();
    assert_eq!(last.kind, SegmentKind::Break);
    assert_eq!((last.start, last.end, last.length), (date(9, 1), date(9, 10), 9));

    // cached figures survive a reload
    let stored = tracker.habit("meditate").unwrap();
    assert_eq!(stored.longest_break, 9);
}

#[test]
fn test_weekly_predefined_collapses_into_weeks() {
    let tracker = tracker();
    let habit = tracker.add_predefined("cdcworkout", date(9, 10)).unwrap();

    let checkins = tracker.store().list_checkins("CDC workout").unwrap();
    assert_eq!(checkins, vec![date(8, 12), date(8, 19), date(8, 26), date(9, 2)]);
    assert_eq!(habit.longest_streak, 4);
    assert_eq!(habit.longest_break, 0);
    assert_eq!(habit.current_streak, 0);

    // checking the current week continues the streak
    let habit = tracker.check("CDC workout", None, date(9, 10)).unwrap();
    assert_eq!(habit.current_streak, 5);
    assert_eq!(habit.longest_streak, 5);
}

#[test]
fn test_all_predefined_habits_load() {
    let tracker = tracker();
    for key in ["reading", "cdcworkout", "vegandiet", "smokingcessation", "meditate"] {
        tracker.add_predefined(key, date(9, 10)).unwrap();
    }
    let habits = tracker.habits().unwrap();
    assert_eq!(habits.len(), 5);
    for habit in &habits {
        assert!(!tracker.segments(&habit.name).unwrap().is_empty(), "{}", habit.name);
    }
}

#[test]
fn test_check_range_then_fill_gap() {
    let tracker = tracker();
    tracker
        .create_habit(
            NewHabit::new("stretch", "Morning stretch", 6, Periodicity::Daily),
            date(8, 12).and_hms_opt(7, 30, 0).unwrap(),
        )
        .unwrap();

    let first = DateRange::new(date(8, 12), date(8, 14)).unwrap();
    let second = DateRange::new(date(8, 17), date(8, 18)).unwrap();
    tracker.check("stretch", Some(first), date(8, 18)).unwrap();
    let habit = tracker.check("stretch", Some(second), date(8, 18)).unwrap();
    assert_eq!(habit.current_streak, 2);
    assert_eq!(habit.longest_streak, 3);
    assert_eq!(habit.longest_break, 2);

    let gap = DateRange::new(date(8, 15), date(8, 16)).unwrap();
    let habit = tracker.check("stretch", Some(gap), date(8, 18)).unwrap();
    assert_eq!(habit.current_streak, 7);
    assert_eq!(habit.longest_break, 0);
    assert_eq!(tracker.segments("stretch").unwrap().len(), 1);
}

#[test]
fn test_rejected_range_leaves_history_untouched() {
    let tracker = tracker();
    tracker.add_predefined("reading", date(9, 10)).unwrap();
    let before = tracker.segments("reading").unwrap();

    let range = DateRange::new(date(9, 9), date(9, 12)).unwrap();
    let err = tracker.check("reading", Some(range), date(9, 10)).unwrap_err();
    assert!(matches!(err, CoreError::RangeValidation { .. }));

    assert_eq!(tracker.segments("reading").unwrap(), before);
    assert!(!tracker
        .store()
        .list_checkins("reading")
        .unwrap()
        .contains(&date(9, 9)));
}

#[test]
fn test_delete_removes_checkins_and_segments() {
    let tracker = tracker();
    tracker.add_predefined("vegandiet", date(9, 10)).unwrap();
    tracker.delete_habit("vegan diet").unwrap();

    assert!(tracker.store().list_checkins("vegan diet").unwrap().is_empty());
    assert!(tracker.store().list_segments("vegan diet").unwrap().is_empty());
    assert!(matches!(
        tracker.habit("vegan diet"),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn test_clear_removes_everything() {
    let tracker = tracker();
    tracker.add_predefined("reading", date(9, 10)).unwrap();
    tracker.add_predefined("meditate", date(9, 10)).unwrap();
    tracker.clear().unwrap();
    assert!(tracker.habits().unwrap().is_empty());
}

#[test]
fn test_analysis_over_stored_habits() {
    let tracker = tracker();
    for key in ["reading", "cdcworkout", "smokingcessation", "meditate"] {
        tracker.add_predefined(key, date(9, 10)).unwrap();
    }
    let habits = tracker.habits().unwrap();

    let report = analysis::max_by(&habits, HabitAttribute::Priority)
        .unwrap()
        .unwrap();
    assert_eq!(report.value, 8);
    assert_eq!(report.names, vec!["smoking cessation", "meditate"]);

    let weekly = analysis::matching(&habits, HabitAttribute::Periodicity, "WEEKLY").unwrap();
    assert_eq!(weekly.len(), 1);

    let by_break = analysis::sorted(&habits, HabitAttribute::LongestBreak, SortOrder::Desc);
    assert_eq!(by_break[0].name, "meditate");
}

#[test]
fn test_history_persists_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habits.db");

    {
        let tracker = HabitTracker::new(HabitDb::open_at(&path).unwrap());
        tracker
            .create_habit(
                NewHabit::new("journal", "Write one page", 3, Periodicity::Daily),
                date(8, 12).and_hms_opt(21, 0, 0).unwrap(),
            )
            .unwrap();
        tracker
            .check("journal", Some(DateRange::new(date(8, 12), date(8, 13)).unwrap()), date(8, 13))
            .unwrap();
    }

    let tracker = HabitTracker::new(HabitDb::open_at(&path).unwrap());
    let habit = tracker.habit("journal").unwrap();
    assert_eq!(habit.current_streak, 2);
    assert_eq!(habit.created_at, date(8, 12).and_hms_opt(21, 0, 0).unwrap());

    // a day later the streak is no longer current
    let habit = tracker.refresh("journal", date(8, 15)).unwrap();
    assert_eq!(habit.current_streak, 0);
    assert_eq!(habit.longest_break, 1);
}
