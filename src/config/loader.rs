//! ConfigLoader: defaults, then an optional file, then EXLOOKUP__* environment.

use super::LookupConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix; nested keys use `__`, e.g. `EXLOOKUP__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "EXLOOKUP";

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults with environment overlay.
    pub fn load() -> Result<LookupConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = Self::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<LookupConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = Self::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = LookupConfig::default();
        Config::builder()
            .set_default("name_max", defaults.name_max as i64)?
            .set_default("upcase_extent", defaults.upcase_extent as i64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("logging.output", defaults.logging.output)
    }

    fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
    }
}
