//! Error types for STAC Merkle computation and verification.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while walking, hashing or rewriting a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed document {location}: {reason}")]
    MalformedDocument { location: String, reason: String },

    #[error("Not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Ambiguous structure in {path:?}: {reason}")]
    AmbiguousStructure { path: PathBuf, reason: String },

    #[error("Unsupported hash function: {0}")]
    UnsupportedHashFunction(String),

    #[error("Unsupported ordering: {0}")]
    UnsupportedOrdering(String),

    #[error("Invalid hex digest: {0}")]
    InvalidDigest(String),

    #[error("Cannot compute a Merkle root from an empty hash set")]
    EmptyHashSet,

    #[error("Invalid verification artifact {path:?}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::MalformedDocument {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a file location to a malformed-document error raised in memory.
    pub fn at(self, path: &std::path::Path) -> Self {
        match self {
            CatalogError::MalformedDocument { reason, .. } => CatalogError::MalformedDocument {
                location: path.display().to_string(),
                reason,
            },
            other => other,
        }
    }
}

/// Errors surfaced by the command-line layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
