//! JSON backup and restore.
//!
//! - **Codec**: command records ↔ a pretty-printed JSON array
//! - **File**: atomic writes so a failed export never truncates a backup
//!
//! # File Format
//!
//! A backup is a JSON array of records with stable field names:
//! ```json
//! [
//!     {
//!         "id": 3,
//!         "command": "git status",
//!         "description": "default",
//!         "created_at": "2024-03-10T08:00:00"
//!     }
//! ]
//! ```

mod codec;
mod file;

pub use codec::{decode, encode, read_backup};
pub use file::{atomic_write, default_export_name, resolve_export_path};
