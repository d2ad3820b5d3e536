//! Show command for a single race's details and recovery window.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use tri_core::{Candidate, Race, RaceId, RaceStatus, derive_recovery, detect_conflict};
use tri_db::Database;

use super::util::{format_verdict, format_when, format_window};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Race ID to show.
    pub id: String,
}

fn describe_status(race: &Race, today: NaiveDate) -> String {
    let days = race.days_until(today);
    match race.status_on(today) {
        RaceStatus::Today => "today".to_string(),
        RaceStatus::Upcoming if days == 1 => "upcoming (tomorrow)".to_string(),
        RaceStatus::Upcoming => format!("upcoming (in {days} days)"),
        RaceStatus::Past if days == -1 => "past (yesterday)".to_string(),
        RaceStatus::Past => format!("past ({} days ago)", -days),
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ShowArgs,
    today: NaiveDate,
) -> Result<()> {
    let id = RaceId::new(args.id.clone())?;
    let Some(race) = db.get_race(&id)? else {
        bail!("race not found: {id}");
    };

    let recovery = derive_recovery(&race);
    let config = race.distance.recovery_config();

    writeln!(writer, "{}", race.title)?;
    writeln!(writer, "  ID:        {}", race.id)?;
    writeln!(writer, "  When:      {}", format_when(race.date, race.time))?;
    writeln!(writer, "  Distance:  {}", race.distance.label())?;
    if let Some(location) = &race.location {
        writeln!(writer, "  Location:  {location}")?;
    }
    writeln!(writer, "  Status:    {}", describe_status(&race, today))?;
    writeln!(
        writer,
        "  Recovery:  {} ({} days, {}; typical range {}-{} days)",
        format_window(&recovery),
        recovery.len_days(),
        recovery.intensity,
        config.min_days,
        config.max_days
    )?;
    if let Some(description) = &race.description {
        writeln!(writer, "  Notes:     {description}")?;
    }

    let others: Vec<Race> = db
        .list_races()?
        .into_iter()
        .filter(|other| other.id != race.id)
        .collect();
    let verdict = detect_conflict(&Candidate::from(&race), &others);
    if let Some(report) = format_verdict(verdict.as_ref()) {
        writeln!(writer)?;
        write!(writer, "{report}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_with, output_string, race, today};
    use chrono::NaiveTime;
    use insta::assert_snapshot;
    use tri_core::RaceDistance;

    #[test]
    fn show_outputs_details_and_recovery() {
        let mut r = race("r1", "Lake 70.3", "2025-08-24", RaceDistance::Middle);
        r.time = NaiveTime::from_hms_opt(7, 15, 0);
        r.location = Some("Lake Placid".to_string());
        r.description = Some("A-race of the season".to_string());
        let db = db_with(&[r]);

        let mut output = Vec::new();
        run(&mut output, &db, &ShowArgs { id: "r1".to_string() }, today()).unwrap();

        assert_snapshot!(output_string(output), @r"
        Lake 70.3
          ID:        r1
          When:      2025-08-24 07:15
          Distance:  Middle (70.3)
          Location:  Lake Placid
          Status:    upcoming (in 54 days)
          Recovery:  2025-08-25 to 2025-09-05 (12 days, heavy; typical range 10-14 days)
          Notes:     A-race of the season
        ");
    }

    #[test]
    fn show_includes_conflict_with_other_race() {
        let db = db_with(&[
            race("r1", "Lake 70.3", "2025-08-24", RaceDistance::Middle),
            race("r2", "Late Sprint", "2025-08-30", RaceDistance::Sprint),
        ]);

        let mut output = Vec::new();
        run(&mut output, &db, &ShowArgs { id: "r2".to_string() }, today()).unwrap();

        let output = output_string(output);
        assert!(
            output.contains("ERROR: This date conflicts with recovery period(s) from: Lake 70.3")
        );
    }

    #[test]
    fn status_descriptions() {
        let r = race("r1", "A", "2025-07-01", RaceDistance::Sprint);
        let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
        let june_30 = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

        assert_eq!(describe_status(&r, day(1)), "today");
        assert_eq!(describe_status(&r, june_30), "upcoming (tomorrow)");
        assert_eq!(describe_status(&r, day(2)), "past (yesterday)");
        assert_eq!(describe_status(&r, day(11)), "past (10 days ago)");
    }

    #[test]
    fn show_missing_race_errors() {
        let db = db_with(&[]);
        let mut output = Vec::new();
        let err = run(&mut output, &db, &ShowArgs { id: "nope".to_string() }, today()).unwrap_err();
        assert!(err.to_string().contains("race not found: nope"));
    }
}
