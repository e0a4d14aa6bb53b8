//! Shared presentation helpers.

use crate::error::ApiError;
use owo_colors::OwoColorize;
use serde::Serialize;

pub fn section_title(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn status_label(passed: bool) -> String {
    if passed {
        format!("{}", "PASSED".green().bold())
    } else {
        format!("{}", "FAILED".red().bold())
    }
}

/// Mark a single check in a table cell.
pub fn check_mark(matches: bool) -> &'static str {
    if matches {
        "ok"
    } else {
        "MISMATCH"
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::OutputError(e.to_string()))
}
