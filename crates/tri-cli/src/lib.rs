//! Race calendar CLI library.
//!
//! This crate provides the CLI interface for the race calendar.

mod cli;
pub mod commands;
mod config;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Commands};
pub use config::Config;
