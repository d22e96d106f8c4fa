//! Save command implementations.
//!
//! `cs [DESCRIPTION...]` captures the last command from shell history;
//! `cs save <COMMAND> [DESCRIPTION...]` stores one given explicitly.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::HistorySource;
use crate::model::CommandRecord;
use crate::storage::SqliteStorage;
use crate::validate::{join_description, require_non_empty, strip_quotes};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

/// Output for a saved command.
#[derive(Serialize)]
struct SaveOutput<'a> {
    #[serde(flatten)]
    record: &'a CommandRecord,
    source: &'static str,
}

/// Capture the last shell command and save it.
///
/// # Errors
///
/// Returns a capture-environment error if history cannot be inspected,
/// `NoCommandFound` if nothing in it is worth saving, or a database error.
pub fn execute_capture(description: &[String], config: &Config, json: bool) -> Result<()> {
    let source = HistorySource::system(config.history_config());
    let command = source.find_last_command()?;
    info!(command = %command, "Captured last command");

    let description = join_description(description);
    store(&command, &description, "history", config, json)
}

/// Save a command given on the command line.
///
/// # Errors
///
/// Returns `RequiredField` if the command is blank, or a database error.
pub fn execute_save(
    command: &str,
    description: &[String],
    config: &Config,
    json: bool,
) -> Result<()> {
    let command = require_non_empty(strip_quotes(command), "command")?;
    let description = join_description(description);
    let description = strip_quotes(&description);

    store(command, description, "explicit", config, json)
}

fn store(
    command: &str,
    description: &str,
    source: &'static str,
    config: &Config,
    json: bool,
) -> Result<()> {
    if crate::is_dry_run() {
        if json {
            let output = serde_json::json!({
                "dry_run": true,
                "command": command.trim(),
                "description": description.trim(),
            });
            println!("{output}");
        } else {
            println!("Would save: {}", command.trim());
        }
        return Ok(());
    }

    let mut storage = SqliteStorage::open(&config.db_path)?;
    let id = storage.insert_command(command, description)?;
    let record = storage
        .get_command(id)?
        .ok_or_else(|| Error::Other(format!("Saved command {id} could not be read back")))?;

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = SaveOutput {
            record: &record,
            source,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if record.has_default_description() {
        println!("{} {}", "Command saved:".green(), record.command);
    } else {
        println!(
            "{} {} {}",
            "Command saved:".green(),
            record.command,
            format!("(description: {})", record.description).dimmed()
        );
    }

    Ok(())
}
