//! Detect candidate dates that land inside other races' recovery windows.
//!
//! Conflicts are advisory. A verdict tells the caller how loudly to warn;
//! it never prevents a race from being saved.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::distance::{Intensity, RaceDistance};
use crate::race::{Race, RaceId};
use crate::recovery::{RecoveryInterval, derive_recovery};

/// How strongly a conflict should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date being proposed for a race.
///
/// `distance` is only informational; detection depends on the date alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub date: NaiveDate,
    pub distance: Option<RaceDistance>,
}

impl Candidate {
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date,
            distance: None,
        }
    }
}

impl From<&Race> for Candidate {
    fn from(race: &Race) -> Self {
        Self {
            date: race.date,
            distance: Some(race.distance),
        }
    }
}

/// The recovery windows a candidate falls inside, with a severity and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictVerdict {
    pub candidate: Candidate,
    pub conflicts: Vec<RecoveryInterval>,
    pub severity: Severity,
    pub message: String,
}

/// A stored race paired with the verdict computed against every other race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceConflict {
    pub race_id: RaceId,
    pub race_title: String,
    pub verdict: ConflictVerdict,
}

/// Checks `candidate` against the recovery windows of `existing_races`.
///
/// When editing a race, the caller must leave its previous version out of
/// `existing_races`. Returns `None` when the date is clear.
pub fn detect_conflict(candidate: &Candidate, existing_races: &[Race]) -> Option<ConflictVerdict> {
    let conflicts: Vec<RecoveryInterval> = existing_races
        .iter()
        .map(derive_recovery)
        .filter(|interval| interval.contains(candidate.date))
        .collect();

    if conflicts.is_empty() {
        return None;
    }

    let severity = if conflicts
        .iter()
        .any(|interval| interval.intensity == Intensity::Heavy)
    {
        Severity::Error
    } else {
        Severity::Warning
    };

    let titles: Vec<&str> = conflicts.iter().map(|i| i.race_title.as_str()).collect();
    let message = format!(
        "This date conflicts with recovery period(s) from: {}",
        titles.join(", ")
    );

    tracing::debug!(
        date = %candidate.date,
        %severity,
        conflicts = conflicts.len(),
        "recovery conflict detected"
    );

    Some(ConflictVerdict {
        candidate: *candidate,
        conflicts,
        severity,
        message,
    })
}

/// Checks every race against all the others and returns the ones in conflict.
///
/// Each race is excluded from its own check by id. Output follows input order.
pub fn scan_conflicts(races: &[Race]) -> Vec<RaceConflict> {
    races
        .iter()
        .filter_map(|race| {
            let others: Vec<Race> = races
                .iter()
                .filter(|other| other.id != race.id)
                .cloned()
                .collect();
            detect_conflict(&Candidate::from(race), &others).map(|verdict| RaceConflict {
                race_id: race.id.clone(),
                race_title: race.title.clone(),
                verdict,
            })
        })
        .collect()
}

/// Summarizes an optional verdict as a severity.
pub fn severity_of(verdict: Option<&ConflictVerdict>) -> Severity {
    verdict.map_or(Severity::None, |v| v.severity)
}
