//! Habit management commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use habitrack_core::{DateRange, Habit, NewHabit, Periodicity, Segment};
use serde::Serialize;

use super::open_tracker;

#[derive(Subcommand)]
pub enum HabitCommand {
    /// Create a new habit
    Create {
        /// Unique habit name
        name: String,
        /// What the habit is about
        #[arg(long, short)]
        description: String,
        /// Priority from 1 (low) to 10 (high)
        #[arg(long, short, default_value_t = 5)]
        priority: i64,
        /// DAILY or WEEKLY
        #[arg(long, default_value = "daily")]
        periodicity: Periodicity,
    },
    /// Delete a habit with its check-ins
    Delete {
        name: String,
    },
    /// Check a habit off for today or a date range
    Check {
        name: String,
        /// First date to check (YYYY-MM-DD); the range ends today unless --end is given
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date to check (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Add one of the predefined habits with its history
    Predefined {
        /// One of: reading, cdcworkout, vegandiet, smokingcessation, meditate
        key: String,
    },
    /// Show a habit with its streaks and breaks
    Show {
        name: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct HabitDetail {
    habit: Habit,
    segments: Vec<Segment>,
}

fn requested_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Option<DateRange>, Box<dyn std::error::Error>> {
    let range = match (start, end) {
        (None, None) => None,
        (Some(start), end) => Some(DateRange::new(start, end.unwrap_or(today))?),
        (None, Some(end)) => Some(DateRange::single(end)),
    };
    Ok(range)
}

pub fn run(command: HabitCommand, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;

    match command {
        HabitCommand::Create {
            name,
            description,
            priority,
            periodicity,
        } => {
            let created_at = today.and_time(Local::now().time());
            let habit = tracker.create_habit(
                NewHabit::new(name, description, priority, periodicity),
                created_at,
            )?;
            println!("Habit created: {}", habit.name);
        }
        HabitCommand::Delete { name } => {
            tracker.delete_habit(&name)?;
            println!("Habit deleted: {name}");
        }
        HabitCommand::Check { name, start, end } => {
            let range = requested_range(start, end, today)?;
            let habit = tracker.check(&name, range, today)?;
            println!(
                "Checked {}: current streak {}, longest streak {}",
                habit.name, habit.current_streak, habit.longest_streak
            );
        }
        HabitCommand::Predefined { key } => {
            let habit = tracker.add_predefined(&key, today)?;
            println!("Habit created: {}", habit.name);
        }
        HabitCommand::Show { name, json } => {
            let habit = tracker.refresh(&name, today)?;
            let segments = tracker.segments(&name)?;
            if json {
                let detail = HabitDetail { habit, segments };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&habit, &segments);
            }
        }
    }
    Ok(())
}

fn print_detail(habit: &Habit, segments: &[Segment]) {
    println!("{} ({}, priority {})", habit.name, habit.periodicity, habit.priority);
    println!("  {}", habit.description);
    println!("  created:        {}", habit.created_at.format("%Y-%m-%d %H:%M"));
    println!("  current streak: {}", habit.current_streak);
    println!("  longest streak: {}", habit.longest_streak);
    println!("  longest break:  {}", habit.longest_break);
    if segments.is_empty() {
        return;
    }
    println!();
    for s in segments {
        println!("  {:<6} {} .. {}  {:>3}", s.kind.as_str(), s.start, s.end, s.length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aug(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn no_flags_checks_today() {
        assert_eq!(requested_range(None, None, aug(20)).unwrap(), None);
    }

    #[test]
    fn start_alone_runs_to_today() {
        let range = requested_range(Some(aug(15)), None, aug(20)).unwrap().unwrap();
        assert_eq!(range, DateRange::new(aug(15), aug(20)).unwrap());
    }

    #[test]
    fn end_alone_checks_that_day() {
        let range = requested_range(None, Some(aug(18)), aug(20)).unwrap().unwrap();
        assert_eq!(range, DateRange::single(aug(18)));
    }

    #[test]
    fn inverted_flags_are_rejected() {
        assert!(requested_range(Some(aug(19)), Some(aug(15)), aug(20)).is_err());
    }
}
