//! CLI route: single route table and run context. Dispatches to tree services and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_build_outcome, format_consistency_report_json, format_consistency_report_text,
    format_verification_report_json, format_verification_report_text,
};
use crate::config::{ConfigLoader, StacMerkleConfig};
use crate::error::ApiError;
use crate::tree::artifact::VerificationArtifact;
use crate::tree::builder::MerkleBuilder;
use crate::tree::path::resolve_catalog_document;
use crate::tree::verifier::Verifier;
use crate::types::{HashFunction, HashMethod, Ordering};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Rendered command result. `success` is false when a check found mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: the effective configuration.
/// Built from the command's directory and optional config path using ConfigLoader only.
pub struct RunContext {
    config: StacMerkleConfig,
}

impl RunContext {
    /// Create run context from a config directory and optional config path.
    pub fn new(config_dir: &Path, config_path: Option<&Path>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(config_dir)?,
        };
        Ok(Self::from_config(config.validated()?))
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(config: StacMerkleConfig) -> Self {
        Self { config }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        info!(command = command.name(), "Running command");
        let result = match command {
            Commands::Compute {
                catalog,
                merkle_tree_file,
                function,
                ordering,
            } => self.handle_compute(
                catalog,
                merkle_tree_file.as_deref(),
                function.as_deref(),
                ordering.as_deref(),
            ),
            Commands::Verify {
                catalog,
                merkle_tree_file,
                embedded,
                format,
            } => self.handle_verify(catalog, merkle_tree_file.as_deref(), *embedded, format),
            Commands::CheckTree {
                merkle_tree_file,
                function,
                ordering,
                format,
            } => self.handle_check_tree(
                merkle_tree_file,
                function.as_deref(),
                ordering.as_deref(),
                format,
            ),
        };
        debug!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn handle_compute(
        &self,
        catalog: &Path,
        merkle_tree_file: Option<&Path>,
        function: Option<&str>,
        ordering: Option<&str>,
    ) -> Result<CommandOutput, ApiError> {
        let hash_method = self.hash_method(function, ordering)?;
        let mut builder = MerkleBuilder::new(catalog.to_path_buf())
            .with_hash_method(hash_method)
            .with_walker_config(self.config.walker.clone())
            .with_artifact_file_name(self.config.artifact.file_name.clone());
        if let Some(path) = merkle_tree_file {
            builder = builder.with_artifact_path(path.to_path_buf());
        }
        let outcome = builder.build()?;
        Ok(CommandOutput::ok(format_build_outcome(&outcome)))
    }

    fn handle_verify(
        &self,
        catalog: &Path,
        merkle_tree_file: Option<&Path>,
        embedded: bool,
        format: &str,
    ) -> Result<CommandOutput, ApiError> {
        let verifier = Verifier::new(catalog.to_path_buf())
            .with_hash_method(self.config.hash_method.clone())
            .with_walker_config(self.config.walker.clone());
        let report = if embedded {
            verifier.verify_embedded()?
        } else {
            let artifact_path = match merkle_tree_file {
                Some(path) => path.to_path_buf(),
                None => self.default_artifact_path(catalog)?,
            };
            verifier.verify(&artifact_path)?
        };

        let text = match format {
            "json" => format_verification_report_json(&report)?,
            _ => format_verification_report_text(&report),
        };
        Ok(CommandOutput {
            text,
            success: report.passed(),
        })
    }

    fn handle_check_tree(
        &self,
        merkle_tree_file: &Path,
        function: Option<&str>,
        ordering: Option<&str>,
        format: &str,
    ) -> Result<CommandOutput, ApiError> {
        let hash_method = self.hash_method(function, ordering)?;
        let artifact = VerificationArtifact::load(merkle_tree_file)?;
        let report = artifact.check_consistency(&hash_method)?;

        let text = match format {
            "json" => format_consistency_report_json(&report)?,
            _ => format_consistency_report_text(&report, artifact.root.count()),
        };
        Ok(CommandOutput {
            text,
            success: report.passed(),
        })
    }

    /// Configured hash method with command-line overrides applied
    fn hash_method(
        &self,
        function: Option<&str>,
        ordering: Option<&str>,
    ) -> Result<HashMethod, ApiError> {
        let mut method = self.config.hash_method.clone();
        if let Some(function) = function {
            method.function = function.parse::<HashFunction>()?;
        }
        if let Some(ordering) = ordering {
            method.ordering = ordering.parse::<Ordering>()?;
        }
        Ok(method)
    }

    /// Artifact file name from config, next to the catalog document
    fn default_artifact_path(&self, catalog: &Path) -> Result<PathBuf, ApiError> {
        let document = resolve_catalog_document(catalog, &self.config.walker.catalog_file)?;
        let dir = document.parent().unwrap_or(Path::new("."));
        Ok(dir.join(&self.config.artifact.file_name))
    }
}
