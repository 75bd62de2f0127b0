pub mod analyse;
pub mod config;
pub mod habit;

use habitrack_core::{Config, HabitDb, HabitTracker};

/// Open the configured database behind a tracker.
pub fn open_tracker() -> Result<HabitTracker<HabitDb>, Box<dyn std::error::Error>> {
    let path = Config::load()?.database_path()?;
    tracing::debug!(path = %path.display(), "opening habit database");
    Ok(HabitTracker::new(HabitDb::open_at(&path)?))
}

pub fn reset(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("refusing to clear the database without --yes".into());
    }
    open_tracker()?.clear()?;
    println!("database cleared");
    Ok(())
}
