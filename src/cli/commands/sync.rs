//! Backup command implementations (JSON export/import).
//!
//! Exports land in the data directory next to the database unless an
//! absolute path is given. Imports read the path exactly as given.

use crate::config::Config;
use crate::error::Result;
use crate::model::timestamp;
use crate::storage::{ImportStats, SqliteStorage};
use crate::sync::{atomic_write, default_export_name, encode, read_backup, resolve_export_path};
use crate::validate::{require_non_empty, strip_quotes};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ExportOutput {
    path: String,
    count: usize,
}

#[derive(Serialize)]
struct ImportOutput<'a> {
    path: String,
    #[serde(flatten)]
    stats: &'a ImportStats,
}

/// Export every saved command to a JSON backup.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the file written.
pub fn export(file: Option<&str>, config: &Config, json: bool) -> Result<()> {
    let name = file
        .map(strip_quotes)
        .filter(|f| !f.is_empty())
        .map_or_else(|| default_export_name(&timestamp::now()), ToString::to_string);
    let path = resolve_export_path(&config.data_dir(), &name);

    let storage = SqliteStorage::open(&config.db_path)?;
    let records = storage.export_commands()?;
    atomic_write(&path, &encode(&records)?)?;

    if crate::is_silent() {
        println!("{}", path.display());
    } else if json {
        let output = ExportOutput {
            path: path.display().to_string(),
            count: records.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{} {} commands to {}",
            "Exported".green(),
            records.len(),
            path.display()
        );
    }

    Ok(())
}

/// Import commands from a JSON backup.
///
/// Records keep their original timestamps and get fresh IDs. Records the
/// store rejects are reported and skipped.
///
/// # Errors
///
/// Returns `RequiredField` if no path was given, or an error if the file
/// cannot be read or parsed.
pub fn import(file: Option<&str>, config: &Config, json: bool) -> Result<()> {
    let file = require_non_empty(file.map(strip_quotes).unwrap_or_default(), "import file")?;
    let path = Path::new(file);
    let records = read_backup(path)?;

    if records.is_empty() {
        if json {
            let output = ImportOutput {
                path: path.display().to_string(),
                stats: &ImportStats::default(),
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("No command records found in {}", path.display());
        }
        return Ok(());
    }

    if crate::is_dry_run() {
        if json {
            let output = serde_json::json!({
                "dry_run": true,
                "path": path.display().to_string(),
                "total": records.len(),
            });
            println!("{output}");
        } else {
            println!("Would import {} command records from {}", records.len(), path.display());
        }
        return Ok(());
    }

    if !json && !crate::is_silent() {
        println!("Importing {} command records...", records.len());
    }

    let mut storage = SqliteStorage::open(&config.db_path)?;
    let stats = storage.bulk_import(&records)?;

    if crate::is_silent() {
        println!("{}/{}", stats.imported, stats.total);
    } else if json {
        let output = ImportOutput {
            path: path.display().to_string(),
            stats: &stats,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        for failure in &stats.failures {
            println!(
                "  {} '{}': {}",
                "Skipped".yellow(),
                failure.command,
                failure.reason
            );
        }
        println!(
            "{} {}/{} records imported",
            "Import finished:".green(),
            stats.imported,
            stats.total
        );
    }

    Ok(())
}
