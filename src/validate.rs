//! Input validation for command-line arguments.
//!
//! Everything here runs before the store is opened, so a bad argument never
//! touches the database.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Answers that confirm a destructive operation (compared lowercased).
pub static AFFIRMATIVE_ANSWERS: LazyLock<HashSet<&str>> =
    LazyLock::new(|| ["y", "yes"].into_iter().collect());

/// Parse a record ID argument.
///
/// # Errors
///
/// Returns `InvalidArgument` unless the input is a positive integer.
pub fn parse_record_id(input: &str) -> Result<i64> {
    match input.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidArgument(format!(
            "ID must be a positive integer, got '{input}'"
        ))),
    }
}

/// Strip surrounding quote characters left over from shell quoting.
#[must_use]
pub fn strip_quotes(input: &str) -> &str {
    input.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Join trailing words into a single description.
///
/// Returns an empty string when no words were given; the store turns that
/// into the default description.
#[must_use]
pub fn join_description(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}

/// Whether a prompt answer confirms the operation.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE_ANSWERS.contains(answer.trim().to_lowercase().as_str())
}

/// Require a non-blank argument.
///
/// # Errors
///
/// Returns `RequiredField` naming the argument if it is blank.
pub fn require_non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::RequiredField(field));
    }
    Ok(value)
}
