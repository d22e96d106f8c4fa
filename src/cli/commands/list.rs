//! List command implementations.

use crate::config::Config;
use crate::error::Result;
use crate::model::{CommandRecord, DayBucket};
use crate::storage::{SqliteStorage, DAY_WINDOW};
use colored::Colorize;
use serde::Serialize;

const RULE_WIDTH: usize = 80;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output for list.
#[derive(Serialize)]
struct ListOutput<'a> {
    commands: &'a [CommandRecord],
    count: usize,
}

/// Output for days.
#[derive(Serialize)]
struct DaysOutput<'a> {
    days: &'a [DayBucket],
    count: usize,
}

/// List every saved command, newest first.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute_list(config: &Config, json: bool) -> Result<()> {
    let storage = SqliteStorage::open(&config.db_path)?;
    let records = storage.list_commands()?;

    if json {
        let output = ListOutput {
            commands: &records,
            count: records.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if crate::is_csv() {
        println!("id,created_at,command,description");
        for record in &records {
            println!("{}", csv_row(record));
        }
    } else if records.is_empty() {
        println!("No saved commands.");
    } else {
        println!();
        println!("{}", "Saved commands:".bold());
        print_table(&records);
        println!("{} commands", records.len());
    }

    Ok(())
}

/// Show saved commands grouped by day for the last week.
///
/// Every day appears, including days with no records.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute_days(config: &Config, json: bool) -> Result<()> {
    let storage = SqliteStorage::open(&config.db_path)?;
    let buckets = storage.list_by_day()?;
    let count = buckets.iter().map(|b| b.records.len()).sum();

    if json {
        let output = DaysOutput {
            days: &buckets,
            count,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if crate::is_csv() {
        println!("date,id,created_at,command,description");
        for bucket in &buckets {
            for record in &bucket.records {
                println!("{},{}", bucket.date, csv_row(record));
            }
        }
        return Ok(());
    }

    println!();
    println!("{}", format!("Commands from the last {DAY_WINDOW} days:").bold());
    for bucket in &buckets {
        println!();
        println!("{}", format!("=== {} ===", bucket.date).cyan());
        if bucket.is_empty() {
            println!("{}", "(no records)".dimmed());
        } else {
            print_table(&bucket.records);
        }
    }

    Ok(())
}

fn print_table(records: &[CommandRecord]) {
    let rule = "-".repeat(RULE_WIDTH);
    println!("{rule}");
    println!(
        "{:<6} | {:<20} | {:<30} | {}",
        "ID", "Time", "Command", "Description"
    );
    println!("{rule}");
    for record in records {
        println!(
            "{:<6} | {:<20} | {:<30} | {}",
            record.id,
            record.created_at.format(TIME_FORMAT).to_string(),
            record.command,
            record.description
        );
    }
    println!("{rule}");
}

fn csv_row(record: &CommandRecord) -> String {
    format!(
        "{},{},{},{}",
        record.id,
        record.created_at.format(TIME_FORMAT),
        crate::csv_escape(&record.command),
        crate::csv_escape(&record.description)
    )
}
