//! Race records and the user-editable draft they are built from.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::distance::RaceDistance;
use crate::error::{CoreError, ValidationError};

/// Opaque, non-empty race identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RaceId(String);

impl RaceId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "race_id" });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RaceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RaceId> for String {
    fn from(id: RaceId) -> Self {
        id.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A scheduled race.
///
/// Owned by the storage layer; the calculators only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    pub distance: RaceDistance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied race fields, before an id and timestamps are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceDraft {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub distance: RaceDistance,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Where a race sits relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceStatus {
    Upcoming,
    Today,
    Past,
}

impl RaceStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Today => "today",
            Self::Past => "past",
        }
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RaceDraft {
    /// Trims text fields and rejects a blank title.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        Ok(Self {
            title,
            location: normalize_optional(self.location),
            description: normalize_optional(self.description),
            ..self
        })
    }

    /// Builds a new race with both timestamps set to `now`.
    pub fn into_race(self, id: RaceId, now: DateTime<Utc>) -> Result<Race, ValidationError> {
        let draft = self.validate()?;
        Ok(Race {
            id,
            title: draft.title,
            date: draft.date,
            time: draft.time,
            distance: draft.distance,
            location: draft.location,
            description: draft.description,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Race {
    /// Returns the editable fields of this race.
    pub fn to_draft(&self) -> RaceDraft {
        RaceDraft {
            title: self.title.clone(),
            date: self.date,
            time: self.time,
            distance: self.distance,
            location: self.location.clone(),
            description: self.description.clone(),
        }
    }

    /// Replaces the editable fields, keeping `id` and `created_at`.
    pub fn apply(&mut self, draft: RaceDraft, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let draft = draft.validate()?;
        self.title = draft.title;
        self.date = draft.date;
        self.time = draft.time;
        self.distance = draft.distance;
        self.location = draft.location;
        self.description = draft.description;
        self.updated_at = now;
        Ok(())
    }

    /// Signed number of days from `today` to the race (negative once it is over).
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.date - today).num_days()
    }

    pub fn status_on(&self, today: NaiveDate) -> RaceStatus {
        match self.date.cmp(&today) {
            Ordering::Greater => RaceStatus::Upcoming,
            Ordering::Equal => RaceStatus::Today,
            Ordering::Less => RaceStatus::Past,
        }
    }
}

/// Sorts races chronologically; untimed races come first on a given day.
pub fn sort_races(races: &mut [Race]) {
    races.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Parses a start time given as `HH:MM`.
///
/// `HH:MM:SS` is accepted only with zero seconds; start times are kept to the
/// minute.
pub fn parse_start_time(s: &str) -> Result<NaiveTime, CoreError> {
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Ok(time);
    }
    match NaiveTime::parse_from_str(s, "%H:%M:%S") {
        Ok(time) if time.second() == 0 => Ok(time),
        _ => Err(CoreError::InvalidStartTime(s.to_string())),
    }
}

/// Serializes race start times as `HH:MM`.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_start_time;

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        value
            .filter(|s| !s.is_empty())
            .map(|s| parse_start_time(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
