//! Read-only projections over a list of habits: maxima, filters and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::habit::{Habit, Periodicity};

/// Habit attribute an analysis works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitAttribute {
    Name,
    Priority,
    CurrentStreak,
    LongestStreak,
    LongestBreak,
    Periodicity,
}

impl HabitAttribute {
    pub const ALL: [HabitAttribute; 6] = [
        HabitAttribute::Name,
        HabitAttribute::Priority,
        HabitAttribute::CurrentStreak,
        HabitAttribute::LongestStreak,
        HabitAttribute::LongestBreak,
        HabitAttribute::Periodicity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitAttribute::Name => "name",
            HabitAttribute::Priority => "priority",
            HabitAttribute::CurrentStreak => "current_streak",
            HabitAttribute::LongestStreak => "longest_streak",
            HabitAttribute::LongestBreak => "longest_break",
            HabitAttribute::Periodicity => "periodicity",
        }
    }

    /// Numeric value of `habit` for this attribute, `None` for text attributes.
    pub fn numeric(&self, habit: &Habit) -> Option<i64> {
        match self {
            HabitAttribute::Priority => Some(habit.priority),
            HabitAttribute::CurrentStreak => Some(i64::from(habit.current_streak)),
            HabitAttribute::LongestStreak => Some(i64::from(habit.longest_streak)),
            HabitAttribute::LongestBreak => Some(i64::from(habit.longest_break)),
            HabitAttribute::Name | HabitAttribute::Periodicity => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, HabitAttribute::Name | HabitAttribute::Periodicity)
    }

    fn compare(&self, a: &Habit, b: &Habit) -> Ordering {
        match self {
            HabitAttribute::Name => a.name.cmp(&b.name),
            HabitAttribute::Periodicity => a.periodicity.as_str().cmp(b.periodicity.as_str()),
            numeric => numeric.numeric(a).cmp(&numeric.numeric(b)),
        }
    }
}

impl fmt::Display for HabitAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitAttribute {
    type Err = CoreError;

    /// Accepts `current_streak`, `current-streak` and `currentstreak` alike.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str().replace('_', "") == wanted)
            .ok_or_else(|| {
                ValidationError::InvalidValue {
                    field: "attribute".to_string(),
                    message: format!(
                        "'{s}' is not one of: {}",
                        Self::ALL.map(|a| a.as_str()).join(", ")
                    ),
                }
                .into()
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::InvalidValue {
                field: "order".to_string(),
                message: format!("'{s}' is not one of: asc, desc"),
            }
            .into()),
        }
    }
}

/// Maximum of a numeric attribute and every habit that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxReport {
    pub attribute: HabitAttribute,
    pub value: i64,
    pub names: Vec<String>,
}

/// Highest value of `attribute` across `habits`.
///
/// Returns `Ok(None)` for an empty list.
///
/// # Errors
/// `Validation` when `attribute` is not numeric.
pub fn max_by(habits: &[Habit], attribute: HabitAttribute) -> Result<Option<MaxReport>> {
    if !attribute.is_numeric() {
        return Err(ValidationError::InvalidValue {
            field: "attribute".to_string(),
            message: format!("'{attribute}' is not a numeric attribute"),
        }
        .into());
    }

    let values: Vec<(i64, &Habit)> = habits
        .iter()
        .filter_map(|habit| attribute.numeric(habit).map(|value| (value, habit)))
        .collect();
    let Some(max) = values.iter().map(|(value, _)| *value).max() else {
        return Ok(None);
    };
    let names = values
        .iter()
        .filter(|(value, _)| *value == max)
        .map(|(_, habit)| habit.name.clone())
        .collect();

    Ok(Some(MaxReport {
        attribute,
        value: max,
        names,
    }))
}

/// Habits whose `attribute` equals `value`.
///
/// Periodicity matches case-insensitively; numeric attributes parse `value`
/// as an integer.
pub fn matching<'a>(habits: &'a [Habit], attribute: HabitAttribute, value: &str) -> Result<Vec<&'a Habit>> {
    let keep: Box<dyn Fn(&Habit) -> bool> = match attribute {
        HabitAttribute::Name => {
            let name = value.trim().to_string();
            Box::new(move |habit| habit.name == name)
        }
        HabitAttribute::Periodicity => {
            let periodicity: Periodicity = value.parse()?;
            Box::new(move |habit| habit.periodicity == periodicity)
        }
        numeric => {
            let wanted: i64 = value.trim().parse().map_err(|_| ValidationError::InvalidValue {
                field: numeric.as_str().to_string(),
                message: format!("cannot parse '{value}' as a number"),
            })?;
            Box::new(move |habit| numeric.numeric(habit) == Some(wanted))
        }
    };

    Ok(habits.iter().filter(|habit| keep(habit)).collect())
}

/// Habits ordered by `attribute`; ties are broken by name, ascending.
pub fn sorted(habits: &[Habit], attribute: HabitAttribute, order: SortOrder) -> Vec<Habit> {
    let mut out = habits.to_vec();
    out.sort_by(|a, b| {
        let by_attr = attribute.compare(a, b);
        let by_attr = match order {
            SortOrder::Asc => by_attr,
            SortOrder::Desc => by_attr.reverse(),
        };
        by_attr.then_with(|| a.name.cmp(&b.name))
    });
    out
}
