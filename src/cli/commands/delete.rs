//! Delete command implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use crate::validate::parse_record_id;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    rows: usize,
}

/// Delete a saved command by ID.
///
/// The ID is validated before the database is opened.
///
/// # Errors
///
/// Returns `InvalidArgument` for a malformed ID, `RecordNotFound` if no
/// command has that ID, or a database error.
pub fn execute(id: &str, config: &Config, json: bool) -> Result<()> {
    let id = parse_record_id(id)?;
    let mut storage = SqliteStorage::open(&config.db_path)?;

    if crate::is_dry_run() {
        if storage.get_command(id)?.is_none() {
            return Err(Error::RecordNotFound { id });
        }
        if json {
            println!("{}", serde_json::json!({ "dry_run": true, "id": id }));
        } else {
            println!("Would delete command {id}");
        }
        return Ok(());
    }

    let rows = storage.delete_command(id)?;
    if rows == 0 {
        return Err(Error::RecordNotFound { id });
    }

    if crate::is_silent() {
        println!("{id}");
    } else if json {
        let output = DeleteOutput { id, rows };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        let noun = if rows == 1 { "row" } else { "rows" };
        println!("{} {id} ({rows} {noun} removed)", "Deleted command".green());
    }

    Ok(())
}
