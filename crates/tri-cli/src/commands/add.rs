//! Add command for scheduling a new race.
//!
//! Conflicts with existing recovery windows are reported but never block the
//! save.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use tri_core::{Candidate, ConflictVerdict, Race, RaceDistance, RaceDraft, RaceId, detect_conflict};
use tri_db::Database;
use uuid::Uuid;

use super::util::{format_verdict, parse_date, parse_time};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Race name.
    #[arg(long)]
    pub title: String,

    /// Race day (YYYY-MM-DD, 'today', 'tomorrow' or 'in N days|weeks').
    #[arg(long)]
    pub date: String,

    /// Start time (HH:MM).
    #[arg(long)]
    pub time: Option<String>,

    /// Distance category: sprint, olympic, middle or long.
    #[arg(long)]
    pub distance: RaceDistance,

    /// Where the race takes place.
    #[arg(long)]
    pub location: Option<String>,

    /// Free-text notes.
    #[arg(long)]
    pub description: Option<String>,
}

impl AddArgs {
    fn to_draft(&self, today: NaiveDate) -> Result<RaceDraft> {
        Ok(RaceDraft {
            title: self.title.clone(),
            date: parse_date(&self.date, today)?,
            time: self.time.as_deref().map(parse_time).transpose()?.flatten(),
            distance: self.distance,
            location: self.location.clone(),
            description: self.description.clone(),
        })
    }
}

/// Validates the draft, checks it against every stored race and saves it.
pub fn create_race(
    db: &Database,
    draft: RaceDraft,
    id: RaceId,
    now: DateTime<Utc>,
) -> Result<(Race, Option<ConflictVerdict>)> {
    let race = draft.into_race(id, now)?;
    let existing = db.list_races()?;
    let verdict = detect_conflict(&Candidate::from(&race), &existing);

    if let Some(verdict) = &verdict {
        tracing::warn!(
            race = %race.id,
            severity = %verdict.severity,
            "saving race inside another race's recovery window"
        );
    }

    db.insert_race(&race).context("failed to save race")?;
    tracing::info!(race = %race.id, date = %race.date, "race created");
    Ok((race, verdict))
}

/// Runs the add command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &AddArgs,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<()> {
    let draft = args.to_draft(today)?;
    let id = RaceId::new(Uuid::new_v4().to_string())?;
    let (race, verdict) = create_race(db, draft, id, now)?;

    if let Some(report) = format_verdict(verdict.as_ref()) {
        write!(writer, "{report}")?;
        writeln!(writer, "Saved anyway; recovery conflicts are advisory.")?;
    }
    writeln!(writer, "Created race {}", race.id)?;
    Ok(())
}
