//! Month grid view models.
//!
//! The grid always has 6 rows of 7 days, starting on the Monday on or before
//! the first of the month, so leading and trailing days from neighboring
//! months fill the gaps. Months whose grid would run past either end of the
//! representable date range are rejected rather than shown partially.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::distance::RaceDistance;
use crate::error::{CoreError, Result};
use crate::race::{Race, sort_races};
use crate::recovery::{RecoveryInterval, derive_all};

/// Number of days shown in a month grid.
pub const GRID_DAYS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDayView {
    pub date: NaiveDate,
    pub is_current_month: bool,
    /// Races on this day, in start-time order.
    pub races: Vec<Race>,
    pub recovery_periods: Vec<RecoveryInterval>,
    /// Set when the day has a race and any recovery window overlapping it.
    pub has_conflict: bool,
}

/// First and last day of the grid for `anchor`'s month.
fn grid_bounds(anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let out_of_range = || CoreError::CalendarOutOfRange(anchor);
    let first = anchor.with_day(1).ok_or_else(out_of_range)?;
    let offset = u64::from(first.weekday().num_days_from_monday());
    let start = first
        .checked_sub_days(Days::new(offset))
        .ok_or_else(out_of_range)?;
    let end = start
        .checked_add_days(Days::new(GRID_DAYS as u64 - 1))
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// First day shown in the grid for `anchor`'s month.
pub fn month_grid_start(anchor: NaiveDate) -> Result<NaiveDate> {
    grid_bounds(anchor).map(|(start, _)| start)
}

/// Date range of races that can appear in, or cast a recovery window onto,
/// the grid for `anchor`'s month.
pub fn race_lookup_range(anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let (start, end) = grid_bounds(anchor)?;
    let lookback = Days::new(u64::from(RaceDistance::LONGEST_RECOVERY_DAYS));
    let from = start.checked_sub_days(lookback).unwrap_or(NaiveDate::MIN);
    Ok((from, end))
}

/// Builds the 42-day grid for the month containing `anchor`.
///
/// Recovery windows come from every race in `races`, so a window started by a
/// race in an earlier month still shows up on the days it covers.
pub fn build_month_view(anchor: NaiveDate, races: &[Race]) -> Result<Vec<CalendarDayView>> {
    let (start, _) = grid_bounds(anchor)?;
    let intervals = derive_all(races);

    let days = start
        .iter_days()
        .take(GRID_DAYS)
        .map(|date| {
            let mut day_races: Vec<Race> =
                races.iter().filter(|r| r.date == date).cloned().collect();
            sort_races(&mut day_races);
            let recovery_periods: Vec<RecoveryInterval> = intervals
                .iter()
                .filter(|interval| interval.contains(date))
                .cloned()
                .collect();
            let has_conflict = !day_races.is_empty() && !recovery_periods.is_empty();

            CalendarDayView {
                date,
                is_current_month: date.year() == anchor.year() && date.month() == anchor.month(),
                races: day_races,
                recovery_periods,
                has_conflict,
            }
        })
        .collect();
    Ok(days)
}
