//! Command record model.
//!
//! A `CommandRecord` is the only thing command-saver persists: the literal
//! shell command line, a free-form description, and when it was saved.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Description stored when the caller supplies none.
pub const DEFAULT_DESCRIPTION: &str = "default";

/// A saved shell command.
///
/// Records are immutable once written; the only mutation is deleting the
/// whole record. Field names are part of the backup file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Store-assigned identifier (ignored on import, a fresh one is assigned)
    #[serde(default)]
    pub id: i64,

    /// The literal shell command line
    pub command: String,

    /// Free-form description, `"default"` when none was given
    #[serde(default = "default_description")]
    pub description: String,

    /// Local time the command was saved
    #[serde(with = "timestamp::serde_export")]
    pub created_at: NaiveDateTime,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl CommandRecord {
    /// Build a record that has not been stored yet.
    #[must_use]
    pub fn new(command: &str, description: &str, created_at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            command: command.to_string(),
            description: description.to_string(),
            created_at,
        }
    }

    /// Local calendar day the record belongs to.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.created_at.date()
    }

    /// Whether the description is the placeholder used when none was given.
    #[must_use]
    pub fn has_default_description(&self) -> bool {
        self.description == DEFAULT_DESCRIPTION
    }
}

/// All records saved on one local calendar day.
///
/// Buckets are produced for every day of the window, so `records` may be
/// empty; renderers show an explicit "no records" marker for those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub records: Vec<CommandRecord>,
}

impl DayBucket {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_deserialize_missing_description_uses_default() {
        let json = r#"{"id": 3, "command": "ls -la", "created_at": "2024-05-01T10:00:00"}"#;
        let record: CommandRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.description, DEFAULT_DESCRIPTION);
        assert!(record.has_default_description());
        assert_eq!(record.created_at, at("2024-05-01 10:00:00"));
    }

    #[test]
    fn test_serialize_field_names_are_stable() {
        let record = CommandRecord {
            id: 7,
            command: "git status".to_string(),
            description: "check tree".to_string(),
            created_at: at("2024-05-01 10:00:00"),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["command"], "git status");
        assert_eq!(value["description"], "check tree");
        assert_eq!(value["created_at"], "2024-05-01T10:00:00");
    }

    #[test]
    fn test_day_bucket_empty() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut bucket = DayBucket::new(date);
        assert!(bucket.is_empty());
        bucket
            .records
            .push(CommandRecord::new("ls", DEFAULT_DESCRIPTION, at("2024-05-01 09:00:00")));
        assert!(!bucket.is_empty());
        assert_eq!(bucket.records[0].day(), date);
    }
}
