//! Single entry point that assembles every configuration layer.

use super::merge::merge_policy;
use super::sources::{catalog_file, environment, global_file};
use super::StacMerkleConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Loads [`StacMerkleConfig`] from defaults, files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the catalog in `catalog_dir`.
    ///
    /// Precedence (lowest to highest): defaults, global file, `stac-merkle.toml`
    /// in the catalog directory, `STAC_MERKLE__*` environment variables.
    pub fn load(catalog_dir: &Path) -> Result<StacMerkleConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = catalog_file::add_to_builder(builder, catalog_dir)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from an explicit file, which replaces the global and catalog files.
    pub fn load_from_file(path: &Path) -> Result<StacMerkleConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Location of the global config file, if one can be determined
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
