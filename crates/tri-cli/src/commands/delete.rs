//! Delete command for removing a race.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use tri_core::RaceId;
use tri_db::Database;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Race ID to delete.
    pub id: String,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &DeleteArgs) -> Result<()> {
    let id = RaceId::new(args.id.clone())?;
    if !db.delete_race(&id)? {
        bail!("race not found: {id}");
    }
    tracing::info!(race = %id, "race deleted");
    writeln!(writer, "Deleted race {id}")?;
    Ok(())
}
