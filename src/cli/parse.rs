//! CLI parse: clap types for stac-merkle. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// STAC Merkle CLI - Tamper-evident hashing for STAC catalogs
#[derive(Parser)]
#[command(name = "stac-merkle")]
#[command(about = "Compute and verify Merkle hashes over STAC catalogs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces the global and catalog config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable logging entirely
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute hashes, annotate every document and write the verification artifact
    Compute {
        /// Catalog document, or the directory containing catalog.json
        catalog: PathBuf,

        /// Where to write the verification artifact (default: next to the catalog)
        #[arg(long)]
        merkle_tree_file: Option<PathBuf>,

        /// Default hash function (sha256, sha384, sha512, blake3)
        #[arg(long)]
        function: Option<String>,

        /// Default ordering of hashes before reduction (ascending, descending, unsorted)
        #[arg(long)]
        ordering: Option<String>,
    },
    /// Recompute hashes and compare them against a baseline without writing
    Verify {
        /// Catalog document, or the directory containing catalog.json
        catalog: PathBuf,

        /// Verification artifact to compare against (default: next to the catalog)
        #[arg(long, conflicts_with = "embedded")]
        merkle_tree_file: Option<PathBuf>,

        /// Compare against the hashes stored in the documents instead of an artifact
        #[arg(long)]
        embedded: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check that a verification artifact is internally consistent
    CheckTree {
        /// Verification artifact to check
        merkle_tree_file: PathBuf,

        /// Hash function for nodes that do not record `merkle:hash_method`
        #[arg(long)]
        function: Option<String>,

        /// Ordering for nodes that do not record `merkle:hash_method`
        #[arg(long)]
        ordering: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Commands {
    /// Stable command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Compute { .. } => "compute",
            Commands::Verify { .. } => "verify",
            Commands::CheckTree { .. } => "check-tree",
        }
    }

    /// Directory whose `stac-merkle.toml` applies to this command
    pub fn config_dir(&self) -> PathBuf {
        let target: &Path = match self {
            Commands::Compute { catalog, .. } | Commands::Verify { catalog, .. } => catalog,
            Commands::CheckTree {
                merkle_tree_file, ..
            } => merkle_tree_file,
        };
        if target.is_dir() {
            return target.to_path_buf();
        }
        match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
