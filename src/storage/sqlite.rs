//! SQLite storage implementation.
//!
//! This module provides the command store backed by SQLite. Writes go
//! through [`SqliteStorage::mutate`], which wraps them in an immediate
//! transaction that commits on success and rolls back on error.

use crate::error::{Error, Result};
use crate::model::timestamp;
use crate::model::{CommandRecord, DayBucket, DEFAULT_DESCRIPTION};
use crate::storage::schema::apply_schema;
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Number of calendar days covered by [`SqliteStorage::list_by_day`].
pub const DAY_WINDOW: u64 = 7;

/// How long a write waits on a locked database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Files SQLite may keep next to the database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportStats {
    /// Records written to the store.
    pub imported: usize,
    /// Records supplied.
    pub total: usize,
    /// Records that were rejected, with the reason.
    pub failures: Vec<ImportFailure>,
}

impl ImportStats {
    /// Returns true if nothing was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A record that could not be imported.
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    /// Position in the supplied batch (0-indexed).
    pub index: usize,
    pub command: String,
    pub reason: String,
}

/// A stored row whose `created_at` could not be read.
struct UnreadableTimestamp {
    id: i64,
    raw: String,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the parent directory and the database if they don't exist,
    /// then applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, connection, or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                info!(dir = %dir.display(), "Creating data directory");
                fs::create_dir_all(dir)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Remove the database file and its SQLite sidecar files.
    ///
    /// Returns `false` if there was no database to remove. The next
    /// [`SqliteStorage::open`] recreates an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be removed.
    pub fn destroy(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)?;
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            let sidecar = Path::new(&sidecar);
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }

        info!(path = %path.display(), "Database removed");
        Ok(true)
    }

    /// Execute a mutation inside an immediate transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;
        tx.commit()?;

        debug!(op, "Mutation committed");
        Ok(result)
    }

    // ==================
    // Command Operations
    // ==================

    /// Save a command stamped with the current local time.
    ///
    /// Both fields are trimmed; an empty description is stored as `"default"`.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField` if the command is empty, or a database error.
    pub fn insert_command(&mut self, command: &str, description: &str) -> Result<i64> {
        self.insert_command_at(command, description, timestamp::now())
    }

    /// Save a command with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField` if the command is empty, or a database error.
    pub fn insert_command_at(
        &mut self,
        command: &str,
        description: &str,
        created_at: NaiveDateTime,
    ) -> Result<i64> {
        let command = command.trim();
        if command.is_empty() {
            return Err(Error::RequiredField("command"));
        }

        let description = match description.trim() {
            "" => DEFAULT_DESCRIPTION,
            d => d,
        };

        self.mutate("insert_command", |tx| {
            tx.execute(
                "INSERT INTO command_history (command, description, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![command, description, timestamp::to_storage(&created_at)],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// List every saved command, newest first.
    ///
    /// Rows whose timestamp cannot be read are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_commands(&self) -> Result<Vec<CommandRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, command, description, created_at
             FROM command_history
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], map_command_row)?;
        collect_readable(rows)
    }

    /// Get a command by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_command(&self, id: i64) -> Result<Option<CommandRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, command, description, created_at FROM command_history WHERE id = ?1",
        )?;

        let rows = stmt.query_map([id], map_command_row)?;
        Ok(collect_readable(rows)?.into_iter().next())
    }

    /// All records for export, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn export_commands(&self) -> Result<Vec<CommandRecord>> {
        self.list_commands()
    }

    /// Records for the last seven local days, today first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_by_day(&self) -> Result<Vec<DayBucket>> {
        self.list_by_day_from(Local::now().date_naive())
    }

    /// Records for the seven days ending at `today`, newest day first.
    ///
    /// Exactly seven buckets are returned, including empty days. Records
    /// inside a bucket are in the order they were saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_by_day_from(&self, today: NaiveDate) -> Result<Vec<DayBucket>> {
        let mut buckets: Vec<DayBucket> = (0..DAY_WINDOW)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(DayBucket::new)
            .collect();

        let Some(first_day) = buckets.last().map(|b| b.date) else {
            return Ok(buckets);
        };

        // One extra day of slack: rows stored with a UTC offset can land on
        // a different local date than their text prefix suggests.
        let lower_bound = first_day
            .checked_sub_days(Days::new(1))
            .unwrap_or(first_day)
            .format("%Y-%m-%d")
            .to_string();

        let mut stmt = self.conn.prepare(
            "SELECT id, command, description, created_at
             FROM command_history
             WHERE created_at >= ?1
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map([lower_bound], map_command_row)?;
        for record in collect_readable(rows)? {
            let day = record.day();
            if let Some(bucket) = buckets.iter_mut().find(|b| b.date == day) {
                bucket.records.push(record);
            }
        }

        Ok(buckets)
    }

    /// Delete a record by ID.
    ///
    /// Returns the number of rows removed: `0`, without touching the store,
    /// if no such record exists, otherwise `1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or delete fails.
    pub fn delete_command(&mut self, id: i64) -> Result<usize> {
        self.mutate("delete_command", |tx| {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM command_history WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?;

            if !exists {
                return Ok(0);
            }

            let rows = tx.execute("DELETE FROM command_history WHERE id = ?1", [id])?;
            debug!(id, rows, "Deleted command");
            Ok(rows)
        })
    }

    /// Insert records verbatim, keeping their original `created_at`.
    ///
    /// Each record gets a fresh ID. A record the store rejects is logged
    /// and skipped; it never aborts the rest of the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the transaction itself cannot be started or
    /// committed.
    pub fn bulk_import(&mut self, records: &[CommandRecord]) -> Result<ImportStats> {
        self.mutate("bulk_import", |tx| {
            let mut stats = ImportStats {
                total: records.len(),
                ..ImportStats::default()
            };

            let mut stmt = tx.prepare(
                "INSERT INTO command_history (command, description, created_at) VALUES (?1, ?2, ?3)",
            )?;

            for (index, record) in records.iter().enumerate() {
                let result = stmt.execute(rusqlite::params![
                    record.command,
                    record.description,
                    timestamp::to_storage(&record.created_at)
                ]);

                match result {
                    Ok(_) => stats.imported += 1,
                    Err(e) => {
                        warn!(index, command = %record.command, error = %e, "Failed to import record");
                        stats.failures.push(ImportFailure {
                            index,
                            command: record.command.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            info!(imported = stats.imported, total = stats.total, "Import finished");
            Ok(stats)
        })
    }
}

// Helper to map command rows; a bad timestamp is returned, not raised
fn map_command_row(
    row: &rusqlite::Row,
) -> rusqlite::Result<std::result::Result<CommandRecord, UnreadableTimestamp>> {
    let id: i64 = row.get(0)?;
    let command: String = row.get(1)?;
    let description: Option<String> = row.get(2)?;

    let created_at = match row.get_ref(3)? {
        ValueRef::Text(text) => {
            let text = String::from_utf8_lossy(text);
            timestamp::parse(&text).ok_or_else(|| text.into_owned())
        }
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.with_timezone(&Local).naive_local())
            .ok_or_else(|| secs.to_string()),
        other => Err(format!("{:?}", other.data_type())),
    };

    Ok(created_at
        .map(|created_at| CommandRecord {
            id,
            command,
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            created_at,
        })
        .map_err(|raw| UnreadableTimestamp { id, raw }))
}

fn collect_readable<I>(rows: I) -> Result<Vec<CommandRecord>>
where
    I: Iterator<Item = rusqlite::Result<std::result::Result<CommandRecord, UnreadableTimestamp>>>,
{
    let mut records = Vec::new();
    for row in rows {
        match row? {
            Ok(record) => records.push(record),
            Err(bad) => {
                warn!(id = bad.id, created_at = %bad.raw, "Skipping record with unreadable timestamp");
            }
        }
    }
    Ok(records)
}
