//! Shared utilities for CLI commands.

use std::fmt::Write;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, NaiveDate, NaiveTime};
use regex::Regex;
use tri_core::{ConflictVerdict, RecoveryInterval, Severity};

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^in\s+(\d+)\s+(day|week)s?$").unwrap());

/// Conservative bound for relative dates (~100 years in days).
const MAX_RELATIVE_DAYS: u64 = 100 * 366;

/// Parse a date argument as either `YYYY-MM-DD` or a relative date.
///
/// Supports:
/// - ISO 8601 calendar date: "2025-07-05"
/// - "today", "tomorrow"
/// - Relative: "in 3 days", "in 2 weeks"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    match s {
        "today" => return Ok(today),
        "tomorrow" => return today.succ_opt().context("date out of range"),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2025-07-05), 'today', 'tomorrow' or 'in N days|weeks'"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if days > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far ahead: {s}");
    }

    today
        .checked_add_days(Days::new(days))
        .context("date out of range")
}

/// Parse an optional `HH:MM` start time. An empty string clears the time.
pub fn parse_time(s: &str) -> anyhow::Result<Option<NaiveTime>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(Some)
        .with_context(|| format!("Invalid time: {s}. Use HH:MM (e.g., 07:30)"))
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(s: &str) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month: {s}. Use YYYY-MM (e.g., 2025-07)"))
}

/// Formats a date with its optional start time.
pub fn format_when(date: NaiveDate, time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => format!("{} {}", date.format("%Y-%m-%d"), t.format("%H:%M")),
        None => date.format("%Y-%m-%d").to_string(),
    }
}

/// Formats a recovery window as `start to end`.
pub fn format_window(interval: &RecoveryInterval) -> String {
    format!(
        "{} to {}",
        interval.start_date.format("%Y-%m-%d"),
        interval.end_date.format("%Y-%m-%d")
    )
}

/// Formats a conflict verdict for terminal output.
///
/// Returns `None` when there is nothing to report.
pub fn format_verdict(verdict: Option<&ConflictVerdict>) -> Option<String> {
    let verdict = verdict?;
    let label = match verdict.severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARNING",
        Severity::None => return None,
    };

    let mut output = String::new();
    writeln!(output, "{label}: {}", verdict.message).unwrap();
    for interval in &verdict.conflicts {
        writeln!(
            output,
            "  - {} ({}): {} recovery {}",
            interval.race_title,
            interval.distance,
            interval.intensity,
            format_window(interval)
        )
        .unwrap();
    }
    Some(output)
}
