//! Edit command for changing fields of an existing race.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use tri_core::{Candidate, ConflictVerdict, Race, RaceDistance, RaceId, detect_conflict};
use tri_db::Database;

use super::util::{format_verdict, parse_date, parse_time};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Race ID to edit.
    pub id: String,

    /// New race name.
    #[arg(long)]
    pub title: Option<String>,

    /// New race day.
    #[arg(long)]
    pub date: Option<String>,

    /// New start time (HH:MM); pass an empty string to clear it.
    #[arg(long)]
    pub time: Option<String>,

    /// New distance category.
    #[arg(long)]
    pub distance: Option<RaceDistance>,

    /// New location; pass an empty string to clear it.
    #[arg(long)]
    pub location: Option<String>,

    /// New notes; pass an empty string to clear them.
    #[arg(long)]
    pub description: Option<String>,
}

/// Applies the requested changes and saves the race.
///
/// The race's own stored version is left out of conflict detection.
pub fn update_race(
    db: &Database,
    args: &EditArgs,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<(Race, Option<ConflictVerdict>)> {
    let id = RaceId::new(args.id.clone())?;
    let Some(mut race) = db.get_race(&id)? else {
        bail!("race not found: {id}");
    };

    let mut draft = race.to_draft();
    if let Some(title) = &args.title {
        draft.title.clone_from(title);
    }
    if let Some(date) = &args.date {
        draft.date = parse_date(date, today)?;
    }
    if let Some(time) = &args.time {
        draft.time = parse_time(time)?;
    }
    if let Some(distance) = args.distance {
        draft.distance = distance;
    }
    if let Some(location) = &args.location {
        draft.location = Some(location.clone());
    }
    if let Some(description) = &args.description {
        draft.description = Some(description.clone());
    }

    race.apply(draft, now)?;

    let others: Vec<Race> = db
        .list_races()?
        .into_iter()
        .filter(|other| other.id != race.id)
        .collect();
    let verdict = detect_conflict(&Candidate::from(&race), &others);
    if let Some(verdict) = &verdict {
        tracing::warn!(
            race = %race.id,
            severity = %verdict.severity,
            "saving race inside another race's recovery window"
        );
    }

    db.update_race(&race).context("failed to save race")?;
    tracing::info!(race = %race.id, date = %race.date, "race updated");
    Ok((race, verdict))
}

/// Runs the edit command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &EditArgs,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<()> {
    let (race, verdict) = update_race(db, args, now, today)?;

    if let Some(report) = format_verdict(verdict.as_ref()) {
        write!(writer, "{report}")?;
        writeln!(writer, "Saved anyway; recovery conflicts are advisory.")?;
    }
    writeln!(writer, "Updated race {}", race.id)?;
    Ok(())
}
