//! Analysis commands over all stored habits.

use chrono::NaiveDate;
use clap::Subcommand;
use habitrack_core::analysis::{self, HabitAttribute, SortOrder};
use habitrack_core::Habit;

use super::open_tracker;

#[derive(Subcommand)]
pub enum AnalyseCommand {
    /// List all habits
    List {
        /// Attribute to sort by
        #[arg(long)]
        sort: Option<HabitAttribute>,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        #[arg(long)]
        json: bool,
    },
    /// Show the habits with the highest value of a numeric attribute
    Max {
        /// priority, current_streak, longest_streak or longest_break
        attribute: HabitAttribute,
    },
    /// Show the habits whose attribute equals a value
    Same {
        /// periodicity, priority or a streak attribute
        attribute: HabitAttribute,
        value: String,
    },
}

pub fn run(command: AnalyseCommand, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;
    // cached streaks depend on the evaluation date
    let habits = tracker.refresh_all(today)?;

    match command {
        AnalyseCommand::List { sort, order, json } => {
            let habits = match sort {
                Some(attribute) => analysis::sorted(&habits, attribute, order),
                None => habits,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else {
                print_table(&habits);
            }
        }
        AnalyseCommand::Max { attribute } => match analysis::max_by(&habits, attribute)? {
            Some(report) => println!(
                "Highest {}: {} ({})",
                report.attribute,
                report.value,
                report.names.join(", ")
            ),
            None => println!("No habits"),
        },
        AnalyseCommand::Same { attribute, value } => {
            let matches = analysis::matching(&habits, attribute, &value)?;
            if matches.is_empty() {
                println!("No habits with {attribute} = {value}");
            }
            for habit in matches {
                println!("{}", habit.name);
            }
        }
    }
    Ok(())
}

fn print_table(habits: &[Habit]) {
    if habits.is_empty() {
        println!("No habits");
        return;
    }
    println!(
        "{:<24} {:<8} {:>8} {:>8} {:>8} {:>8}",
        "NAME", "PERIOD", "PRIORITY", "CURRENT", "LONGEST", "BREAK"
    );
    for h in habits {
        println!(
            "{:<24} {:<8} {:>8} {:>8} {:>8} {:>8}",
            h.name,
            h.periodicity.as_str(),
            h.priority,
            h.current_streak,
            h.longest_streak,
            h.longest_break
        );
    }
}
