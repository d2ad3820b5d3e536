//! Import command reading a JSON array of races.
//!
//! Accepts the output of `tri export` as well as records from older versions,
//! which named the distance field `type` and may lack ids or timestamps.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tri_core::{Race, RaceDistance, RaceDraft, RaceId, parse_start_time};
use tri_db::Database;
use uuid::Uuid;

/// A race as found in an import file.
#[derive(Debug, Deserialize)]
struct ImportedRace {
    #[serde(default)]
    id: Option<String>,
    title: String,
    date: NaiveDate,
    #[serde(default)]
    time: Option<String>,
    #[serde(alias = "type")]
    distance: RaceDistance,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl ImportedRace {
    fn into_race(self, now: DateTime<Utc>) -> Result<Race> {
        let id = match self.id.filter(|id| !id.is_empty()) {
            Some(id) => RaceId::new(id)?,
            None => RaceId::new(Uuid::new_v4().to_string())?,
        };
        let time = self
            .time
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| parse_start_time(t).with_context(|| format!("invalid race {id}")))
            .transpose()?;
        let draft = RaceDraft {
            title: self.title,
            date: self.date,
            time,
            distance: self.distance,
            location: self.location,
            description: self.description,
        };
        let created_at = self.created_at.unwrap_or(now);
        let mut race = draft
            .into_race(id.clone(), created_at)
            .with_context(|| format!("invalid race {id}"))?;
        race.updated_at = self.updated_at.unwrap_or(created_at);
        Ok(race)
    }
}

/// Parses and stores races, skipping ids that already exist.
///
/// Returns `(inserted, skipped)`.
pub fn import_races<R: Read>(
    reader: R,
    db: &mut Database,
    now: DateTime<Utc>,
) -> Result<(usize, usize)> {
    let records: Vec<ImportedRace> =
        serde_json::from_reader(reader).context("failed to parse race JSON")?;
    let races = records
        .into_iter()
        .map(|record| record.into_race(now))
        .collect::<Result<Vec<_>>>()?;

    let inserted = db.insert_races(&races).context("failed to store races")?;
    let skipped = races.len() - inserted;
    tracing::info!(inserted, skipped, "imported races");
    Ok((inserted, skipped))
}

pub fn run<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    db: &mut Database,
    now: DateTime<Utc>,
) -> Result<()> {
    let (inserted, skipped) = import_races(reader, db, now)?;
    writeln!(writer, "Imported {inserted} new races ({skipped} already present)")?;
    Ok(())
}
