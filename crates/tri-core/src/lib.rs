//! Core domain logic for the triathlon race calendar.
//!
//! This crate contains the fundamental types and pure calculations for:
//! - Recovery: deriving each race's post-race recovery window
//! - Conflicts: flagging dates that land inside another race's recovery window
//! - Calendar: annotating a month grid with races and recovery windows

pub mod calendar;
pub mod conflict;
pub mod distance;
mod error;
pub mod race;
pub mod recovery;

#[cfg(test)]
mod test_support;

pub use calendar::{
    CalendarDayView, GRID_DAYS, build_month_view, month_grid_start, race_lookup_range,
};
pub use conflict::{
    Candidate, ConflictVerdict, RaceConflict, Severity, detect_conflict, scan_conflicts,
    severity_of,
};
pub use distance::{Intensity, RaceDistance, RecoveryConfig};
pub use error::{CoreError, Result, ValidationError};
pub use race::{Race, RaceDraft, RaceId, RaceStatus, parse_start_time, sort_races};
pub use recovery::{RecoveryInterval, derive_all, derive_recovery};
