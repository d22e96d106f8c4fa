//! Error types for command-saver.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, 6=capture, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for command-saver operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,

    // Not Found (exit 3)
    RecordNotFound,
    NoCommandFound,

    // Validation (exit 4)
    InvalidArgument,
    RequiredField,

    // Capture environment (exit 6)
    UnsupportedPlatform,
    UnsupportedShell,
    ShellNotDetected,
    HistoryFileMissing,

    // Config (exit 7)
    HomeDirUnavailable,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::NoCommandFound => "NO_COMMAND_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            Self::UnsupportedShell => "UNSUPPORTED_SHELL",
            Self::ShellNotDetected => "SHELL_NOT_DETECTED",
            Self::HistoryFileMissing => "HISTORY_FILE_MISSING",
            Self::HomeDirUnavailable => "HOME_DIR_UNAVAILABLE",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::RecordNotFound | Self::NoCommandFound => 3,
            Self::InvalidArgument | Self::RequiredField => 4,
            Self::UnsupportedPlatform
            | Self::UnsupportedShell
            | Self::ShellNotDetected
            | Self::HistoryFileMissing => 6,
            Self::HomeDirUnavailable => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::RequiredField | Self::NoCommandFound
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in command-saver operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine the home directory")]
    HomeDirUnavailable,

    #[error("Automatic capture of the last command is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Could not detect the current shell")]
    ShellNotDetected,

    #[error("Unsupported shell: {shell}")]
    UnsupportedShell { shell: String },

    #[error("History file not found: {}", path.display())]
    HistoryFileMissing { path: PathBuf },

    #[error("No valid command found in shell history")]
    NoCommandFound,

    #[error("No record with ID {id}")]
    RecordNotFound { id: i64 },

    #[error("Missing required value: {0}")]
    RequiredField(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::HomeDirUnavailable => ErrorCode::HomeDirUnavailable,
            Self::UnsupportedPlatform => ErrorCode::UnsupportedPlatform,
            Self::ShellNotDetected => ErrorCode::ShellNotDetected,
            Self::UnsupportedShell { .. } => ErrorCode::UnsupportedShell,
            Self::HistoryFileMissing { .. } => ErrorCode::HistoryFileMissing,
            Self::NoCommandFound => ErrorCode::NoCommandFound,
            Self::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            Self::RequiredField(_) => ErrorCode::RequiredField,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// True when the last command could not be captured at all, as opposed
    /// to history being readable but holding nothing worth saving.
    #[must_use]
    pub const fn is_capture_unavailable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform
                | Self::ShellNotDetected
                | Self::UnsupportedShell { .. }
                | Self::HistoryFileMissing { .. }
        )
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::UnsupportedPlatform | Self::ShellNotDetected | Self::UnsupportedShell { .. } => {
                Some("Save the command explicitly: cs save \"<command>\" [description]".to_string())
            }

            Self::HistoryFileMissing { path } => Some(format!(
                "Make sure your shell writes history to {}, or point CS_HISTFILE at it.",
                path.display()
            )),

            Self::NoCommandFound => Some(
                "Only commands that resolve to an executable are saved. \
                 Use `cs save \"<command>\"` to store one directly."
                    .to_string(),
            ),

            Self::RecordNotFound { .. } => {
                Some("Use `cs list` to see saved commands and their IDs.".to_string())
            }

            Self::InvalidArgument(msg) if msg.contains("ID") => {
                Some("IDs are positive integers shown by `cs list`.".to_string())
            }

            Self::RequiredField("import file") => {
                Some("Usage: cs import <backup file>".to_string())
            }

            Self::HomeDirUnavailable => {
                Some("Set HOME, or pass --db to choose a database location.".to_string())
            }

            Self::RequiredField(_)
            | Self::InvalidArgument(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
