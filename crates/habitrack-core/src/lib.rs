//! # Habitrack Core Library
//!
//! This library provides the core logic for the Habitrack habit tracker.
//! Everything is available through the `habitrack` CLI binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Streak Engine**: A pure function that turns a habit's check-in dates into
//!   an ordered list of streak and break segments
//! - **Storage**: SQLite-based habit, check-in and segment storage and TOML-based
//!   configuration
//! - **Tracker**: Check-in writes and segment recomputation as one unit of work
//! - **Analysis**: Maxima, filters and ordering over stored habits
//!
//! ## Key Components
//!
//! - [`segment`]: Streak/break segmentation
//! - [`HabitTracker`]: Habit operations over a [`HabitStore`]
//! - [`HabitDb`]: SQLite implementation of [`HabitStore`]
//! - [`Config`]: Application configuration management

pub mod analysis;
pub mod calendar;
pub mod error;
pub mod habit;
pub mod seed;
pub mod storage;
pub mod streaks;
pub mod tracker;

pub use analysis::{HabitAttribute, MaxReport, SortOrder};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use habit::{Habit, NewHabit, Periodicity};
pub use storage::{Config, HabitDb, HabitStore};
pub use streaks::{segment, Segment, SegmentKind, StreakSummary};
pub use tracker::{DateRange, HabitTracker};
