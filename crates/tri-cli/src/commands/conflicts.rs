//! Conflicts command listing stored races inside another race's recovery window.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use tri_core::{RaceConflict, scan_conflicts};
use tri_db::Database;

#[derive(Debug, Args)]
pub struct ConflictsArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Format scan results for human-readable output.
pub fn format_conflicts(conflicts: &[RaceConflict]) -> String {
    let mut output = String::new();

    if conflicts.is_empty() {
        writeln!(output, "No recovery conflicts.").unwrap();
        return output;
    }

    for conflict in conflicts {
        let verdict = &conflict.verdict;
        writeln!(
            output,
            "{}  {} [{}]",
            verdict.candidate.date.format("%Y-%m-%d"),
            conflict.race_title,
            verdict.severity
        )
        .unwrap();
        writeln!(output, "    {}", verdict.message).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "{} race(s) fall inside another race's recovery window.",
        conflicts.len()
    )
    .unwrap();
    output
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &ConflictsArgs) -> Result<()> {
    let races = db.list_races()?;
    let conflicts = scan_conflicts(&races);
    tracing::debug!(races = races.len(), conflicts = conflicts.len(), "scanned for conflicts");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&conflicts)?)?;
    } else {
        write!(writer, "{}", format_conflicts(&conflicts))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_with, output_string, race};
    use insta::assert_snapshot;
    use tri_core::RaceDistance;

    #[test]
    fn no_conflicts() {
        let db = db_with(&[
            race("r1", "Spring Sprint", "2025-07-05", RaceDistance::Sprint),
            race("r2", "Next Sprint", "2025-07-09", RaceDistance::Sprint),
        ]);
        let mut output = Vec::new();
        run(&mut output, &db, &ConflictsArgs { json: false }).unwrap();
        assert_eq!(output_string(output), "No recovery conflicts.\n");
    }

    #[test]
    fn lists_each_conflicting_race() {
        let db = db_with(&[
            race("r1", "Spring Sprint", "2025-07-05", RaceDistance::Sprint),
            race("r2", "City Olympic", "2025-07-07", RaceDistance::Olympic),
            race("r3", "Lake 70.3", "2025-08-24", RaceDistance::Middle),
            race("r4", "Late Sprint", "2025-08-30", RaceDistance::Sprint),
        ]);
        let mut output = Vec::new();
        run(&mut output, &db, &ConflictsArgs { json: false }).unwrap();

        assert_snapshot!(output_string(output), @r"
        2025-07-07  City Olympic [warning]
            This date conflicts with recovery period(s) from: Spring Sprint
        2025-08-30  Late Sprint [error]
            This date conflicts with recovery period(s) from: Lake 70.3

        2 race(s) fall inside another race's recovery window.
        ");
    }

    #[test]
    fn json_output() {
        let db = db_with(&[
            race("r3", "Lake 70.3", "2025-08-24", RaceDistance::Middle),
            race("r4", "Late Sprint", "2025-08-30", RaceDistance::Sprint),
        ]);
        let mut output = Vec::new();
        run(&mut output, &db, &ConflictsArgs { json: true }).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output_string(output)).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["race_id"], "r4");
        assert_eq!(rows[0]["verdict"]["severity"], "error");
    }
}
