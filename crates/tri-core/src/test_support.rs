//! Fixtures shared by unit tests.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::distance::RaceDistance;
use crate::race::{Race, RaceId};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn race(id: &str, title: &str, on: &str, distance: RaceDistance) -> Race {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Race {
        id: RaceId::new(id).unwrap(),
        title: title.to_string(),
        date: date(on),
        time: None,
        distance,
        location: None,
        description: None,
        created_at: created,
        updated_at: created,
    }
}
