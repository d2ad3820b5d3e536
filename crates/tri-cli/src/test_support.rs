//! Fixtures shared by command tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tri_core::{Race, RaceDistance, RaceId};
use tri_db::Database;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

pub fn race(id: &str, title: &str, date: &str, distance: RaceDistance) -> Race {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Race {
        id: RaceId::new(id).unwrap(),
        title: title.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: None,
        distance,
        location: None,
        description: None,
        created_at: created,
        updated_at: created,
    }
}

/// In-memory database holding the given races.
pub fn db_with(races: &[Race]) -> Database {
    let db = Database::open_in_memory().unwrap();
    for race in races {
        db.insert_race(race).unwrap();
    }
    db
}

pub fn output_string(output: Vec<u8>) -> String {
    String::from_utf8(output).unwrap()
}
