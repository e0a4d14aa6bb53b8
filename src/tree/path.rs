//! Catalog path resolution

use crate::error::CatalogError;
use std::path::{Path, PathBuf};

/// Canonicalize a path that must exist
///
/// Uses dunce so Windows paths stay in their familiar form.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, CatalogError> {
    dunce::canonicalize(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::NotFound(path.to_path_buf())
        } else {
            CatalogError::io(path, e)
        }
    })
}

/// Resolve the catalog document from a path naming either the document or its directory.
pub fn resolve_catalog_document(input: &Path, catalog_file: &str) -> Result<PathBuf, CatalogError> {
    let candidate = if input.is_dir() {
        input.join(catalog_file)
    } else {
        input.to_path_buf()
    };
    if !candidate.is_file() {
        return Err(CatalogError::NotFound(candidate));
    }
    canonicalize_path(&candidate)
}

/// Path shown in logs and reports: relative to `base` when possible.
pub fn display_path(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
