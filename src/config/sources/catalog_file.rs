//! Catalog-local config file source: `stac-merkle.toml` next to the catalog document

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

/// File name looked up in the catalog directory
pub const CATALOG_CONFIG_FILE: &str = "stac-merkle.toml";

/// Add the catalog-local config file to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    catalog_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = catalog_dir.join(CATALOG_CONFIG_FILE);
    if !path.is_file() {
        return Ok(builder);
    }
    debug!(config_path = %path.display(), "Loading catalog configuration");
    Ok(builder.add_source(File::from(path).required(false)))
}
