//! Data models for command-saver.
//!
//! - [`CommandRecord`] - a saved command line
//! - [`DayBucket`] - records grouped under one calendar day
//! - [`timestamp`] - textual timestamp formats shared by storage and backups

pub mod command;
pub mod timestamp;

pub use command::{CommandRecord, DayBucket, DEFAULT_DESCRIPTION};
