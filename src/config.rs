//! Configuration System
//!
//! Layered configuration: built-in defaults, an optional global file, an optional
//! `stac-merkle.toml` beside the catalog, then `STAC_MERKLE__*` environment
//! variables. Command-line flags are applied on top by the CLI layer.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::artifact::DEFAULT_ARTIFACT_FILE;
use crate::tree::walker::WalkerConfig;
use crate::types::HashMethod;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::catalog_file::CATALOG_CONFIG_FILE;
pub use sources::global_file::GLOBAL_CONFIG_ENV;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StacMerkleConfig {
    /// Hash method applied where no document declares one
    #[serde(default)]
    pub hash_method: HashMethod,

    /// Verification artifact settings
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Catalog layout
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Verification artifact settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// File name written next to the catalog document
    #[serde(default = "default_artifact_file")]
    pub file_name: String,
}

fn default_artifact_file() -> String {
    DEFAULT_ARTIFACT_FILE.to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            file_name: default_artifact_file(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    HashMethod(String),
    Artifact(String),
    Walker(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::HashMethod(msg) => write!(f, "hash_method: {}", msg),
            ValidationError::Artifact(msg) => write!(f, "artifact: {}", msg),
            ValidationError::Walker(msg) => write!(f, "walker: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StacMerkleConfig {
    /// Validate the entire configuration
    ///
    /// Hash function and ordering names are already checked while deserializing.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.hash_method.fields.is_empty() {
            errors.push(ValidationError::HashMethod(
                "fields must list at least one field or \"*\"".to_string(),
            ));
        }
        if self.artifact.file_name.trim().is_empty() {
            errors.push(ValidationError::Artifact("file_name cannot be empty".to_string()));
        }
        for (name, value) in [
            ("catalog_file", &self.walker.catalog_file),
            ("collection_file", &self.walker.collection_file),
            ("collections_dir", &self.walker.collections_dir),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::Walker(format!("{} cannot be empty", name)));
            }
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold every problem into one error.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
