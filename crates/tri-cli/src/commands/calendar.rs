//! Calendar command rendering a 6-week month grid.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Args;
use tri_core::{CalendarDayView, build_month_view, race_lookup_range};
use tri_db::Database;

use super::util::parse_month;

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub month: Option<String>,

    /// Output the day cells as JSON.
    #[arg(long)]
    pub json: bool,
}

fn marker(day: &CalendarDayView) -> char {
    if day.has_conflict {
        '!'
    } else if !day.races.is_empty() {
        '*'
    } else if !day.recovery_periods.is_empty() {
        '~'
    } else {
        ' '
    }
}

fn format_cell(day: &CalendarDayView) -> String {
    let marker = marker(day);
    if !day.is_current_month && marker == ' ' {
        return "  .".to_string();
    }
    let label = format!("{marker}{}", day.date.day());
    format!("{label:>3}")
}

/// Format a month grid for terminal output.
pub fn format_month(anchor: NaiveDate, days: &[CalendarDayView]) -> String {
    let mut output = String::new();

    writeln!(output, "{}", anchor.format("%B %Y")).unwrap();
    let header: Vec<String> = WEEKDAYS.iter().map(|d| format!("{d:>3}")).collect();
    writeln!(output, "{}", header.join(" ")).unwrap();
    for week in days.chunks(7) {
        let cells: Vec<String> = week.iter().map(format_cell).collect();
        writeln!(output, "{}", cells.join(" ")).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "* race  ~ recovery  ! race during recovery  . other month"
    )
    .unwrap();
    writeln!(output).unwrap();

    let month_races: Vec<&CalendarDayView> = days
        .iter()
        .filter(|d| d.is_current_month && !d.races.is_empty())
        .collect();
    if month_races.is_empty() {
        writeln!(output, "No races this month.").unwrap();
        return output;
    }

    for day in month_races {
        for race in &day.races {
            let flag = if day.has_conflict { "  [conflict]" } else { "" };
            writeln!(
                output,
                "{}  {} ({}){}",
                day.date.format("%Y-%m-%d"),
                race.title,
                race.distance,
                flag
            )
            .unwrap();
        }
    }

    output
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &CalendarArgs,
    today: NaiveDate,
) -> Result<()> {
    let anchor = match &args.month {
        Some(month) => parse_month(month)?,
        None => today,
    };
    let (from, to) = race_lookup_range(anchor)?;
    let races = db.list_races_in_range(from, to)?;
    let days = build_month_view(anchor, &races)?;
    tracing::debug!(month = %anchor.format("%Y-%m"), races = races.len(), "built month view");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
    } else {
        write!(writer, "{}", format_month(anchor, &days))?;
    }
    Ok(())
}
