//! Check command for a dry-run conflict check of a date.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tri_core::{Candidate, RaceDistance, detect_conflict};
use tri_db::Database;

use super::util::{format_verdict, parse_date};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Date to check.
    #[arg(long)]
    pub date: String,

    /// Distance of the race being considered.
    #[arg(long)]
    pub distance: Option<RaceDistance>,

    /// Output the verdict as JSON (`null` when clear).
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &CheckArgs,
    today: NaiveDate,
) -> Result<()> {
    let candidate = Candidate {
        date: parse_date(&args.date, today)?,
        distance: args.distance,
    };
    let races = db.list_races()?;
    let verdict = detect_conflict(&candidate, &races);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&verdict)?)?;
        return Ok(());
    }

    match format_verdict(verdict.as_ref()) {
        Some(report) => write!(writer, "{report}")?,
        None => writeln!(
            writer,
            "No recovery conflicts on {}.",
            candidate.date.format("%Y-%m-%d")
        )?,
    }
    Ok(())
}
