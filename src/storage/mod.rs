//! SQLite storage layer for saved commands.
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{ImportFailure, ImportStats, SqliteStorage, DAY_WINDOW};
