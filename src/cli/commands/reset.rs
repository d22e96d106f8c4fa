//! Reset command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::SqliteStorage;
use crate::validate::is_affirmative;
use colored::Colorize;
use std::io::{self, BufRead, Write};

const PROMPT: &str =
    "Warning: this deletes every saved command and cannot be undone. Continue? (y/N): ";

/// Delete the database file after confirmation.
///
/// A missing database is reported, not treated as an error. The next
/// command that opens the store recreates it empty.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or the file removed.
pub fn execute(force: bool, config: &Config, json: bool) -> Result<()> {
    let db_path = &config.db_path;

    if !db_path.exists() {
        if json {
            println!("{}", serde_json::json!({ "reset": false, "reason": "not_found" }));
        } else {
            println!("Database file does not exist: {}", db_path.display());
        }
        return Ok(());
    }

    if crate::is_dry_run() {
        if json {
            let output = serde_json::json!({
                "dry_run": true,
                "path": db_path.display().to_string(),
            });
            println!("{output}");
        } else {
            println!("Would remove database: {}", db_path.display());
        }
        return Ok(());
    }

    if !force {
        let stdin = io::stdin();
        let confirmed = confirm(PROMPT, &mut stdin.lock(), &mut io::stdout())?;
        if !confirmed {
            if json {
                println!("{}", serde_json::json!({ "reset": false, "reason": "cancelled" }));
            } else {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    SqliteStorage::destroy(db_path)?;

    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        println!("{}", "Database cleared.".green());
    }
    Ok(())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}
