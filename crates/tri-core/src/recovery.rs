//! Post-race recovery windows.
//!
//! A race's recovery window starts the day after the race and runs for the
//! recommended number of days for its distance, inclusive at both ends:
//!
//! ```text
//! race 2025-07-05 (sprint, 3 days) -> [2025-07-06, 2025-07-08]
//! ```

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::distance::{Intensity, RaceDistance};
use crate::race::{Race, RaceId};

/// The inclusive date range following a race during which racing is discouraged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryInterval {
    pub race_id: RaceId,
    pub race_title: String,
    pub distance: RaceDistance,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub intensity: Intensity,
}

impl RecoveryInterval {
    /// Whether `date` falls inside the window (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Number of calendar days covered by the window.
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Derives the recovery window for a race.
///
/// Dates near `NaiveDate::MAX` saturate at the last representable day.
pub fn derive_recovery(race: &Race) -> RecoveryInterval {
    let recommended = u64::from(race.distance.recommended_days());
    RecoveryInterval {
        race_id: race.id.clone(),
        race_title: race.title.clone(),
        distance: race.distance,
        start_date: add_days(race.date, 1),
        end_date: add_days(race.date, recommended),
        intensity: race.distance.intensity(),
    }
}

/// Derives one window per race, preserving input order.
pub fn derive_all(races: &[Race]) -> Vec<RecoveryInterval> {
    races.iter().map(derive_recovery).collect()
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
