//! Timestamp text formats.
//!
//! Stored and exported timestamps are local wall-clock times without an
//! offset, which keeps them lexically sortable. Reading is lenient: rows and
//! backups written by older releases may carry fractional seconds, a `T`
//! separator, or an explicit UTC offset.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};

/// Format used in the `created_at` column.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format used in backup files.
pub const EXPORT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const NAIVE_FORMATS: [&str; 2] = [STORAGE_FORMAT, EXPORT_FORMAT];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Current local time, truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Render a timestamp for the `created_at` column.
#[must_use]
pub fn to_storage(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Parse a timestamp in any accepted format.
///
/// Offset-carrying values are converted to local time.
#[must_use]
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, fmt) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Serde adapter for backup files.
pub mod serde_export {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EXPORT_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(EXPORT_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
