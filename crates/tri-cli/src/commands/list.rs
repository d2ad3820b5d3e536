//! List command for showing races in date order.
//!
//! Each row carries the race's recovery window, its status relative to today
//! and the severity of any recovery conflict with the other stored races.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tri_core::{
    ConflictVerdict, Race, RaceId, RaceStatus, RecoveryInterval, Severity, derive_recovery,
    scan_conflicts, severity_of,
};
use tri_db::Database;

use super::util::format_window;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Hide races that are already over.
    #[arg(long)]
    pub upcoming: bool,
}

/// A race with everything the list view shows about it.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    #[serde(flatten)]
    pub race: Race,
    pub recovery: RecoveryInterval,
    pub status: RaceStatus,
    pub conflict: Severity,
}

/// Builds list entries for all stored races.
pub fn get_entries(db: &Database, today: NaiveDate, upcoming_only: bool) -> Result<Vec<ListEntry>> {
    let races = db.list_races()?;
    let verdicts: HashMap<RaceId, ConflictVerdict> = scan_conflicts(&races)
        .into_iter()
        .map(|c| (c.race_id, c.verdict))
        .collect();

    let entries = races
        .into_iter()
        .map(|race| {
            let conflict = severity_of(verdicts.get(&race.id));
            ListEntry {
                recovery: derive_recovery(&race),
                status: race.status_on(today),
                conflict,
                race,
            }
        })
        .filter(|entry| !upcoming_only || entry.status != RaceStatus::Past)
        .collect();
    Ok(entries)
}

/// Format entries for human-readable output.
pub fn format_entries(entries: &[ListEntry]) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        writeln!(output, "No races scheduled.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'tri add --title <name> --date <YYYY-MM-DD> --distance <sprint|olympic|middle|long>'."
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<10}  {:<5}  {:<8}  {:<22}  {:<24}  Status",
        "Date", "Time", "Distance", "Title", "Recovery"
    )
    .unwrap();
    writeln!(
        output,
        "──────────  ─────  ────────  ──────────────────────  ────────────────────────  ────────"
    )
    .unwrap();

    for entry in entries {
        let race = &entry.race;
        let time = race
            .time
            .map_or_else(String::new, |t| t.format("%H:%M").to_string());
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let title = if race.title.chars().count() > 22 {
            format!("{}...", race.title.chars().take(19).collect::<String>())
        } else {
            race.title.clone()
        };
        let conflict = match entry.conflict {
            Severity::None => String::new(),
            severity => format!("  [{severity}]"),
        };

        writeln!(
            output,
            "{:<10}  {:<5}  {:<8}  {:<22}  {:<24}  {}{}",
            race.date.format("%Y-%m-%d"),
            time,
            race.distance,
            title,
            format_window(&entry.recovery),
            entry.status,
            conflict
        )
        .unwrap();
    }

    output
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ListArgs,
    today: NaiveDate,
) -> Result<()> {
    let entries = get_entries(db, today, args.upcoming)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        write!(writer, "{}", format_entries(&entries))?;
    }
    Ok(())
}
