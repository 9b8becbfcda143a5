//! Configuration
//!
//! Settings for building a `Volume`: name length limit, optional up-case
//! table file, and logging. Loaded through `ConfigLoader`.

pub mod loader;

pub use loader::ConfigLoader;

use crate::collate::{Collator, UpcaseTable};
use crate::encoding::Utf8Encoder;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::types::EXFAT_NAME_MAX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_name_max() -> usize {
    EXFAT_NAME_MAX
}

fn default_upcase_extent() -> usize {
    128
}

/// Lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Longest accepted path component, in code units (clamped to 255)
    #[serde(default = "default_name_max")]
    pub name_max: usize,

    /// Raw little-endian up-case table; None uses the built-in ASCII table
    #[serde(default)]
    pub upcase_table: Option<PathBuf>,

    /// Extent of the built-in ASCII table
    #[serde(default = "default_upcase_extent")]
    pub upcase_extent: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            name_max: default_name_max(),
            upcase_table: None,
            upcase_extent: default_upcase_extent(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Build the collator described by this configuration.
    pub fn collator(&self) -> Result<Collator, ApiError> {
        let table = match &self.upcase_table {
            Some(path) => UpcaseTable::load(path)?,
            None => UpcaseTable::ascii(self.upcase_extent),
        };
        Ok(Collator::new(table))
    }

    pub fn encoder(&self) -> Utf8Encoder {
        Utf8Encoder::new(self.name_max)
    }
}
