//! Last-command capture from shell history.
//!
//! [`HistorySource`] works out which shell is active, pulls its most recent
//! history entries, and walks them newest-first until it finds a line worth
//! saving:
//!
//! 1. Shell detection from the configured identifier (`zsh` or `bash`)
//! 2. History entries from the shell's own listing facility, falling back to
//!    the tail of the raw history file
//! 3. Self-invocation filtering (this tool, `cargo run` of it, `history`, `fc`)
//! 4. Executable validation of the first token
//!
//! # Submodules
//!
//! - [`parse`] - raw history line handling
//! - [`probe`] - subprocess-backed capabilities behind the [`ShellProbe`] trait

pub mod parse;
pub mod probe;

pub use probe::{ShellProbe, SystemProbe};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BIN_NAME;
use crate::error::{Error, Result};

/// Number of most recent history entries inspected by default.
pub const DEFAULT_SCAN_WINDOW: usize = 100;

/// Shells whose history can be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Zsh,
    Bash,
}

impl ShellKind {
    /// Detect the shell from an identifier such as `/usr/bin/zsh`.
    ///
    /// Matching is a case-sensitive substring test, zsh first.
    #[must_use]
    pub fn detect(identifier: &str) -> Option<Self> {
        if identifier.contains("zsh") {
            Some(Self::Zsh)
        } else if identifier.contains("bash") {
            Some(Self::Bash)
        } else {
            None
        }
    }

    /// Program name used to invoke the shell.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Zsh => "zsh",
            Self::Bash => "bash",
        }
    }

    /// History file name relative to the home directory.
    #[must_use]
    pub const fn history_file_name(self) -> &'static str {
        match self {
            Self::Zsh => ".zsh_history",
            Self::Bash => ".bash_history",
        }
    }
}

/// Settings for [`HistorySource`].
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Shell identifier, normally `$SHELL`
    pub shell: Option<String>,
    /// Home directory holding the default history files
    pub home: Option<PathBuf>,
    /// Explicit history file, bypassing the per-shell default
    pub history_file: Option<PathBuf>,
    /// Directory that relative executables are resolved against
    pub cwd: Option<PathBuf>,
    /// Name this tool is invoked as, filtered out of history
    pub bin_name: String,
    /// How many recent entries to inspect
    pub scan_window: usize,
    /// Ask the shell to list its history before reading the file directly
    pub prefer_shell_listing: bool,
    /// False on platforms where automatic capture is not available
    pub platform_supported: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            shell: None,
            home: None,
            history_file: None,
            cwd: None,
            bin_name: BIN_NAME.to_string(),
            scan_window: DEFAULT_SCAN_WINDOW,
            prefer_shell_listing: true,
            platform_supported: !cfg!(windows),
        }
    }
}

/// Finds the most recent saveable command in shell history.
pub struct HistorySource<P = SystemProbe> {
    config: HistoryConfig,
    probe: P,
}

impl HistorySource<SystemProbe> {
    /// History source backed by real subprocesses.
    #[must_use]
    pub fn system(config: HistoryConfig) -> Self {
        Self::new(config, SystemProbe)
    }
}

impl<P: ShellProbe> HistorySource<P> {
    #[must_use]
    pub fn new(config: HistoryConfig, probe: P) -> Self {
        Self { config, probe }
    }

    /// Find the last command that is worth saving.
    ///
    /// # Errors
    ///
    /// Capture-environment errors (`UnsupportedPlatform`, `ShellNotDetected`,
    /// `UnsupportedShell`, `HistoryFileMissing`) mean history could not be
    /// inspected at all. `NoCommandFound` means it was inspected and nothing
    /// survived filtering and validation. I/O errors reading the history
    /// file are passed through.
    pub fn find_last_command(&self) -> Result<String> {
        if !self.config.platform_supported {
            return Err(Error::UnsupportedPlatform);
        }

        let shell = self.detect_shell()?;
        let path = self.history_path(shell)?;
        if !path.exists() {
            return Err(Error::HistoryFileMissing { path });
        }

        let entries = self.recent_entries(shell, &path)?;
        let command = self.select_candidate(&entries).ok_or(Error::NoCommandFound)?;

        debug!(command = %command, "Found last command");
        Ok(command)
    }

    fn detect_shell(&self) -> Result<ShellKind> {
        let identifier = self
            .config
            .shell
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(Error::ShellNotDetected)?;

        ShellKind::detect(identifier).ok_or_else(|| Error::UnsupportedShell {
            shell: identifier.to_string(),
        })
    }

    fn history_path(&self, shell: ShellKind) -> Result<PathBuf> {
        if let Some(path) = &self.config.history_file {
            return Ok(path.clone());
        }

        self.config
            .home
            .as_ref()
            .map(|home| home.join(shell.history_file_name()))
            .ok_or(Error::HomeDirUnavailable)
    }

    /// Most recent entries, oldest first, at most `scan_window` long.
    fn recent_entries(&self, shell: ShellKind, path: &Path) -> Result<Vec<String>> {
        let window = self.config.scan_window;

        if self.config.prefer_shell_listing {
            match self.probe.list_recent_history(shell, path, window) {
                Ok(lines) if !lines.is_empty() => return Ok(tail(lines, window)),
                Ok(_) => debug!(shell = shell.program(), "Shell listed no history, reading file"),
                Err(e) => {
                    debug!(shell = shell.program(), error = %e, "Shell history listing failed, reading file");
                }
            }
        }

        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(tail(parse::raw_entries(&content, shell), window))
    }

    /// Walk entries newest-first and return the first saveable one.
    ///
    /// A line that fails validation does not stop the scan.
    fn select_candidate(&self, entries: &[String]) -> Option<String> {
        for entry in entries.iter().rev() {
            let line = entry.trim();
            if line.is_empty() || parse::is_self_invocation(line, &self.config.bin_name) {
                continue;
            }

            let Some(program) = line.split_whitespace().next() else {
                continue;
            };

            if self.is_runnable(program) {
                return Some(line.to_string());
            }
            debug!(line, "Skipping history entry, executable not found");
        }
        None
    }

    fn is_runnable(&self, program: &str) -> bool {
        if program.contains('/') {
            self.resolve_path(program).is_some_and(|p| p.exists())
        } else {
            self.probe.executable_exists(program)
        }
    }

    fn resolve_path(&self, program: &str) -> Option<PathBuf> {
        if let Some(rest) = program.strip_prefix("~/") {
            return self.config.home.as_ref().map(|home| home.join(rest));
        }

        let path = Path::new(program);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }

        let cwd = self.config.cwd.as_ref();
        if cwd.is_none() {
            debug!(program, "No working directory to resolve relative path against");
        }
        cwd.map(|cwd| cwd.join(path))
    }
}

fn tail(mut entries: Vec<String>, window: usize) -> Vec<String> {
    if entries.len() > window {
        entries.drain(..entries.len() - window);
    }
    entries
}
