//! Version command implementation.

use crate::config::BIN_NAME;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
    build: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if json {
        let output = VersionOutput {
            name: BIN_NAME,
            version,
            build,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{BIN_NAME} version {version} ({build})");
    Ok(())
}
