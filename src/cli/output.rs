//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, CatalogError};

/// Exit status when a command ran and its check passed
pub const EXIT_OK: i32 = 0;
/// Exit status when a verification found mismatches
pub const EXIT_MISMATCH: i32 = 1;
/// Exit status for every error
pub const EXIT_ERROR: i32 = 2;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Catalog(CatalogError::NotFound(path)) => {
            format!("error: {} does not exist", path.display())
        }
        other => format!("error: {}", other),
    }
}
