//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    add::AddArgs, calendar::CalendarArgs, check::CheckArgs, conflicts::ConflictsArgs,
    delete::DeleteArgs, edit::EditArgs, list::ListArgs, show::ShowArgs,
};

/// Triathlon race calendar.
///
/// Schedules races, derives each race's recovery window from its distance and
/// warns when a race lands inside another race's recovery window.
#[derive(Debug, Parser)]
#[command(name = "tri", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Schedule a new race.
    Add(AddArgs),

    /// Change fields of an existing race.
    Edit(EditArgs),

    /// Remove a race.
    Delete(DeleteArgs),

    /// Show one race with its recovery window.
    Show(ShowArgs),

    /// List races in date order.
    List(ListArgs),

    /// Show a month grid with races and recovery windows.
    Calendar(CalendarArgs),

    /// Check a date against existing recovery windows without saving anything.
    Check(CheckArgs),

    /// Report stored races that fall inside another race's recovery window.
    Conflicts(ConflictsArgs),

    /// Export all races as JSON to stdout.
    Export,

    /// Import races from JSON on stdin.
    Import,
}
