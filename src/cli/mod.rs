//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// Bookmark shell commands worth remembering.
///
/// Run without a subcommand to save the last command from your shell
/// history, optionally followed by a description.
#[derive(Parser, Debug)]
#[command(
    name = "cs",
    author,
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Description for the captured command
    #[arg(value_name = "DESCRIPTION", trailing_var_arg = true)]
    pub description: Vec<String>,

    /// Database path (default: ~/.command_saver/commands.db)
    #[arg(long, global = true, env = "CS_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID of saved commands
    #[arg(long, global = true)]
    pub silent: bool,

    /// Preview changes without writing to the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all saved commands, newest first
    #[command(visible_alias = "l")]
    List,

    /// Show saved commands for each of the last 7 days
    #[command(visible_alias = "d")]
    Days,

    /// Save a command given on the command line
    #[command(visible_alias = "y")]
    Save {
        /// Command to save (quote it if it has arguments)
        command: String,

        /// Optional description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Delete a saved command by ID
    #[command(visible_alias = "rm")]
    Delete {
        /// ID of the command to delete
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Export saved commands to a JSON backup
    #[command(visible_alias = "o")]
    Export {
        /// Backup file name (default: bak<timestamp>.json in the data directory)
        file: Option<String>,
    },

    /// Import commands from a JSON backup
    #[command(visible_alias = "i")]
    Import {
        /// Backup file to read
        file: Option<String>,
    },

    /// Delete the database and every saved command
    #[command(visible_alias = "c")]
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Shells supported by `completions`.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
