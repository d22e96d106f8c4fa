//! Command implementations.

pub mod completions;
pub mod delete;
pub mod list;
pub mod reset;
pub mod save;
pub mod sync;
pub mod version;
