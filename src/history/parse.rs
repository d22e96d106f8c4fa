//! Raw shell history parsing.
//!
//! History files are not normalized across shells or configurations:
//! - zsh extended history prefixes entries with `: <epoch>:<duration>;`
//! - zsh continues multi-line entries with a trailing backslash
//! - bash with `HISTTIMEFORMAT` interleaves `#<epoch>` comment lines
//! - `history` in bash prints an event number before each entry

use std::sync::LazyLock;

use regex::Regex;

use super::ShellKind;

/// Commands used to inspect history; never worth saving.
pub const INTROSPECTION_COMMANDS: [&str; 2] = ["history", "fc"];

/// Package name `cargo run -p` would name when building this tool.
const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

static BASH_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\d+$").expect("valid regex"));

static HISTORY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\*?\s+").expect("valid regex"));

/// Strip the zsh metadata prefix from a raw history line.
///
/// The command follows the first `:0;` when present, otherwise the first
/// bare `;`. Lines without either are returned trimmed.
#[must_use]
pub fn normalize_zsh_line(line: &str) -> &str {
    if let Some((_, command)) = line.split_once(":0;") {
        return command.trim();
    }
    if let Some((_, command)) = line.split_once(';') {
        return command.trim();
    }
    line.trim()
}

/// Split raw history file content into entries, oldest first.
///
/// Entries are normalized for the shell and blank entries are dropped.
#[must_use]
pub fn raw_entries(content: &str, shell: ShellKind) -> Vec<String> {
    match shell {
        ShellKind::Zsh => fold_continuations(content)
            .iter()
            .map(|entry| normalize_zsh_line(entry).to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        ShellKind::Bash => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !BASH_TIMESTAMP.is_match(line))
            .map(ToString::to_string)
            .collect(),
    }
}

/// Join lines ending in a backslash with the line that follows.
fn fold_continuations(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut pending: Option<String> = None;

    for line in content.lines() {
        let mut entry = match pending.take() {
            Some(mut prev) => {
                prev.push('\n');
                prev.push_str(line);
                prev
            }
            None => line.to_string(),
        };

        if entry.ends_with('\\') {
            entry.pop();
            pending = Some(entry);
        } else {
            entries.push(entry);
        }
    }

    if let Some(rest) = pending {
        entries.push(rest);
    }
    entries
}

/// Split numbered history listing output into entries, oldest first.
///
/// Both `history` (bash) and `fc -l` (zsh) prefix each entry with its event
/// number. Lines without a number continue the previous multi-line entry.
#[must_use]
pub fn parse_listing(output: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();

    for line in output.lines() {
        if HISTORY_NUMBER.is_match(line) {
            entries.push(strip_history_number(line).to_string());
        } else if let Some(last) = entries.last_mut() {
            last.push('\n');
            last.push_str(line);
        } else {
            entries.push(line.to_string());
        }
    }

    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Remove the event number a history listing prints.
#[must_use]
pub fn strip_history_number(line: &str) -> &str {
    match HISTORY_NUMBER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Whether a history line is this tool being run, or history introspection.
#[must_use]
pub fn is_self_invocation(line: &str, bin_name: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let Some(program) = tokens.next() else {
        return false;
    };

    if program == "cargo" {
        let args: Vec<&str> = tokens.collect();
        return args.first() == Some(&"run") && runs_this_tool(&args[1..], bin_name);
    }

    program == bin_name
        || program
            .strip_prefix("./")
            .is_some_and(|rest| rest == bin_name)
        || program
            .rsplit_once('/')
            .is_some_and(|(_, name)| name == bin_name)
        || INTROSPECTION_COMMANDS.contains(&program)
}

/// Whether `cargo run` arguments select this tool's binary or package.
///
/// Only cargo's own arguments count; everything after `--` goes to the
/// program being run.
fn runs_this_tool(args: &[&str], bin_name: &str) -> bool {
    let mut args = args.iter().take_while(|arg| **arg != "--");

    while let Some(arg) = args.next() {
        let selected = match *arg {
            "--bin" => args.next().is_some_and(|v| *v == bin_name),
            "-p" | "--package" => args.next().is_some_and(|v| *v == PACKAGE_NAME),
            other => {
                other.strip_prefix("--bin=") == Some(bin_name)
                    || other.strip_prefix("--package=") == Some(PACKAGE_NAME)
            }
        };
        if selected {
            return true;
        }
    }
    false
}
