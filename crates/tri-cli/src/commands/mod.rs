//! CLI subcommand implementations.

pub mod add;
pub mod calendar;
pub mod check;
pub mod conflicts;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod show;
pub mod util;
