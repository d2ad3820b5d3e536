use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tri_cli::commands::{
    add, calendar, check, conflicts, delete, edit, export, import, list, show,
};
use tri_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<tri_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    tri_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let now = Utc::now();
    let today = Local::now().date_naive();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut db = open_database(cli.config.as_deref())?;

    match command {
        Commands::Add(args) => add::run(&mut out, &db, args, now, today)?,
        Commands::Edit(args) => edit::run(&mut out, &db, args, now, today)?,
        Commands::Delete(args) => delete::run(&mut out, &db, args)?,
        Commands::Show(args) => show::run(&mut out, &db, args, today)?,
        Commands::List(args) => list::run(&mut out, &db, args, today)?,
        Commands::Calendar(args) => calendar::run(&mut out, &db, args, today)?,
        Commands::Check(args) => check::run(&mut out, &db, args, today)?,
        Commands::Conflicts(args) => conflicts::run(&mut out, &db, args)?,
        Commands::Export => export::run(&mut out, &db)?,
        Commands::Import => import::run(std::io::stdin().lock(), &mut out, &mut db, now)?,
    }

    out.flush()?;
    Ok(())
}
