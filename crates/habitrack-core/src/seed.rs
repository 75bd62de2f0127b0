//! Built-in example habits with a pre-generated check-in history.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::habit::{NewHabit, Periodicity};

/// Creation date shared by every predefined habit.
pub const SEED_CREATED_ON: (i32, u32, u32) = (2024, 8, 12);

/// A predefined habit and its recorded check-ins (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy)]
pub struct Predefined {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i64,
    pub periodicity: Periodicity,
    pub checkins: &'static [&'static str],
}

pub const PREDEFINED: &[Predefined] = &[
    Predefined {
        key: "reading",
        name: "reading",
        description: "10 minutes of daily reading",
        priority: 4,
        periodicity: Periodicity::Daily,
        checkins: &[
            "2024-08-12", "2024-08-14", "2024-08-19", "2024-08-22", "2024-08-23",
            "2024-08-30", "2024-08-31", "2024-09-01", "2024-09-02", "2024-09-03",
            "2024-09-04", "2024-09-05", "2024-09-08",
        ],
    },
    Predefined {
        key: "cdcworkout",
        name: "CDC workout",
        description: "CDC recommended workout 180 minutes of moderate activity per week",
        priority: 2,
        periodicity: Periodicity::Weekly,
        checkins: &[
            "2024-08-12", "2024-08-14", "2024-08-15", "2024-08-17", "2024-08-20",
            "2024-08-23", "2024-08-27", "2024-08-28", "2024-08-30", "2024-09-01",
            "2024-09-02", "2024-09-03", "2024-09-05", "2024-09-06", "2024-09-08",
        ],
    },
    Predefined {
        key: "vegandiet",
        name: "vegan diet",
        description: "Following a healthy plant-based diet",
        priority: 4,
        periodicity: Periodicity::Daily,
        checkins: &[
            "2024-08-12", "2024-08-15", "2024-08-16", "2024-08-17", "2024-08-18",
            "2024-08-20", "2024-08-22", "2024-08-23", "2024-08-27", "2024-08-28",
            "2024-08-30", "2024-09-02", "2024-09-03", "2024-09-04", "2024-09-05",
        ],
    },
    Predefined {
        key: "smokingcessation",
        name: "smoking cessation",
        description: "Not having smoked today",
        priority: 8,
        periodicity: Periodicity::Daily,
        checkins: &[
            "2024-08-12", "2024-08-14", "2024-08-15", "2024-08-16", "2024-08-17",
            "2024-08-19", "2024-08-23", "2024-08-25", "2024-08-28", "2024-08-29",
            "2024-08-30", "2024-09-04", "2024-09-06", "2024-09-08",
        ],
    },
    Predefined {
        key: "meditate",
        name: "meditate",
        description: "10 minutes of meditation at any time of the day",
        priority: 8,
        periodicity: Periodicity::Daily,
        checkins: &[
            "2024-08-12", "2024-08-16", "2024-08-17", "2024-08-20", "2024-08-21",
            "2024-08-22", "2024-08-26", "2024-08-27", "2024-08-28", "2024-08-31",
        ],
    },
];

impl Predefined {
    pub fn new_habit(&self) -> NewHabit {
        NewHabit::new(self.name, self.description, self.priority, self.periodicity)
    }

    pub fn created_on() -> NaiveDate {
        let (y, m, d) = SEED_CREATED_ON;
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
    }

    /// Check-in dates, skipping any entry that is not a valid date.
    pub fn checkin_dates(&self) -> Vec<NaiveDate> {
        self.checkins
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect()
    }
}

/// Keys accepted by [`find`], comma separated.
pub fn known_keys() -> String {
    PREDEFINED
        .iter()
        .map(|p| p.key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Look up a predefined habit by key, ignoring case.
pub fn find(key: &str) -> Result<&'static Predefined, ValidationError> {
    let wanted = key.trim().to_lowercase();
    PREDEFINED
        .iter()
        .find(|p| p.key == wanted)
        .ok_or_else(|| ValidationError::UnknownPredefined {
            key: key.to_string(),
            known: known_keys(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_seed_is_a_valid_habit_with_parseable_dates() {
        for seed in PREDEFINED {
            seed.new_habit().validate().unwrap();
            let dates = seed.checkin_dates();
            assert_eq!(dates.len(), seed.checkins.len(), "{}", seed.key);
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "{}", seed.key);
            assert!(dates.iter().all(|d| *d >= Predefined::created_on()));
        }
    }

    #[test]
    fn find_ignores_case() {
        assert_eq!(find("CDCWorkout").unwrap().name, "CDC workout");
    }

    #[test]
    fn unknown_key_lists_valid_keys() {
        let err = find("jogging").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("jogging"));
        assert!(msg.contains("smokingcessation"));
    }
}
