//! Export command writing every stored race as a JSON array.

use std::io::Write;

use anyhow::Result;
use tri_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let races = db.list_races()?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&races)?)?;
    tracing::debug!(count = races.len(), "exported races");
    Ok(())
}
