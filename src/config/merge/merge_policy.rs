//! Merge rules: defaults, override order, conflict handling.

use crate::tree::artifact::DEFAULT_ARTIFACT_FILE;
use crate::types::default_description;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("hash_method.function", "sha256")?
        .set_default("hash_method.fields", vec!["*"])?
        .set_default("hash_method.ordering", "ascending")?
        .set_default("hash_method.description", default_description())?
        .set_default("artifact.file_name", DEFAULT_ARTIFACT_FILE)?
        .set_default("walker.follow_symlinks", false)?
        .set_default("walker.catalog_file", "catalog.json")?
        .set_default("walker.collection_file", "collection.json")?
        .set_default("walker.collections_dir", "collections")
}
