//! Atomic file operations for backups.
//!
//! Writes go to a temporary file next to the target, are synced to disk,
//! then renamed over the target.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::Result;

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` appended)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Write to temp file
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content)?;
        writer.flush()?;
        // Sync to disk before rename
        writer.get_ref().sync_all()?;
    }

    // Atomic rename
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Backup file name derived from a point in time, e.g. `bak20240310_080000.json`.
#[must_use]
pub fn default_export_name(at: &NaiveDateTime) -> String {
    at.format("bak%Y%m%d_%H%M%S.json").to_string()
}

/// Where an export with the given name is written.
///
/// Absolute paths are used as-is; anything else lands in the data directory.
#[must_use]
pub fn resolve_export_path(data_dir: &Path, name: &str) -> PathBuf {
    let name = Path::new(name);
    if name.is_absolute() {
        name.to_path_buf()
    } else {
        data_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("backup.json");

        atomic_write(&path, b"[]\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[]\n");
        assert!(!dir.path().join("nested").join("backup.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");

        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_default_export_name() {
        let at = timestamp::parse("2024-03-10 08:05:09").unwrap();
        assert_eq!(default_export_name(&at), "bak20240310_080509.json");
    }

    #[test]
    fn test_resolve_export_path() {
        let data_dir = Path::new("/home/u/.command_saver");
        assert_eq!(
            resolve_export_path(data_dir, "mine.json"),
            data_dir.join("mine.json")
        );
        assert_eq!(
            resolve_export_path(data_dir, "/tmp/out.json"),
            PathBuf::from("/tmp/out.json")
        );
    }
}
