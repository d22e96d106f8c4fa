//! Configuration management.
//!
//! Process environment is read exactly once, in [`Config::from_env`]. Every
//! other component receives the resolved values, so history capture and the
//! store can be exercised in tests without touching the real environment.
//!
//! # Layout
//!
//! - **Database**: `~/.command_saver/commands.db` unless `--db` / `CS_DB` is set
//! - **Exports**: written next to the database unless an absolute path is given

use crate::error::{Error, Result};
use crate::history::HistoryConfig;

use std::path::{Path, PathBuf};

/// Name of the per-user data directory under the home directory.
pub const DATA_DIR_NAME: &str = ".command_saver";

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "commands.db";

/// Name this tool is installed and invoked as.
pub const BIN_NAME: &str = "cs";

/// Environment variable overriding the shell history file location.
pub const HISTFILE_ENV: &str = "CS_HISTFILE";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// User home directory, if one could be determined
    pub home: Option<PathBuf>,
    /// Shell identifier, normally the value of `SHELL`
    pub shell: Option<String>,
    /// Explicit history file, bypassing the per-shell default
    pub history_file: Option<PathBuf>,
    /// Database location
    pub db_path: PathBuf,
    /// Working directory used to resolve relative executables
    pub cwd: Option<PathBuf>,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `HomeDirUnavailable` if no database path was given and the
    /// home directory cannot be determined.
    pub fn from_env(db_override: Option<&Path>) -> Result<Self> {
        let home = home_dir();
        let db_path = resolve_db_path(db_override, home.as_deref())?;

        Ok(Self {
            home,
            shell: non_empty_env("SHELL"),
            history_file: non_empty_env(HISTFILE_ENV).map(PathBuf::from),
            db_path,
            cwd: std::env::current_dir().ok(),
        })
    }

    /// Directory holding the database; default destination for exports.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.db_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Settings for last-command capture.
    #[must_use]
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            shell: self.shell.clone(),
            home: self.home.clone(),
            history_file: self.history_file.clone(),
            cwd: self.cwd.clone(),
            ..HistoryConfig::default()
        }
    }
}

/// Get the user's home directory.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Default data directory for a given home directory.
#[must_use]
pub fn default_data_dir(home: &Path) -> PathBuf {
    home.join(DATA_DIR_NAME)
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag or `CS_DB`, merged by clap)
/// 2. `~/.command_saver/commands.db`
///
/// # Errors
///
/// Returns `HomeDirUnavailable` if the default location is needed but there
/// is no home directory.
pub fn resolve_db_path(explicit_path: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    home.map(|h| default_data_dir(h).join(DB_FILE_NAME))
        .ok_or(Error::HomeDirUnavailable)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
