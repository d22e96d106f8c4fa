//! Backup encoding.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};
use crate::model::CommandRecord;

/// Indentation used for backup files.
const INDENT: &[u8] = b"    ";

/// Encode records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(records: &[CommandRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decode a JSON array of records.
///
/// A well-formed empty array yields no records.
///
/// # Errors
///
/// Returns a JSON error if the input is not an array of records.
pub fn decode(bytes: &[u8]) -> Result<Vec<CommandRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read and decode a backup file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn read_backup(path: &Path) -> Result<Vec<CommandRecord>> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InvalidArgument(format!("Backup file not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    decode(&bytes)
}
