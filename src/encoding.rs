//! Path component encoding
//!
//! Converts the bytes of one path component into the code-unit form used by
//! node names.

use crate::error::EncodingError;
use crate::types::{CodeUnit, NodeName, EXFAT_NAME_MAX};

/// Converts path components into node names
pub trait ComponentEncoder: Send + Sync {
    fn encode(&self, component: &[u8]) -> Result<NodeName, EncodingError>;
}

/// UTF-8 to UTF-16 encoder with a length limit
#[derive(Debug, Clone)]
pub struct Utf8Encoder {
    name_max: usize,
}

impl Utf8Encoder {
    /// `name_max` is clamped to `EXFAT_NAME_MAX`.
    pub fn new(name_max: usize) -> Self {
        Utf8Encoder {
            name_max: name_max.min(EXFAT_NAME_MAX),
        }
    }

    pub fn name_max(&self) -> usize {
        self.name_max
    }
}

impl Default for Utf8Encoder {
    fn default() -> Self {
        Self::new(EXFAT_NAME_MAX)
    }
}

impl ComponentEncoder for Utf8Encoder {
    fn encode(&self, component: &[u8]) -> Result<NodeName, EncodingError> {
        if component.is_empty() {
            return Err(EncodingError::Empty);
        }
        let text = std::str::from_utf8(component).map_err(|_| EncodingError::InvalidUtf8)?;
        let units: Vec<CodeUnit> = text.encode_utf16().collect();
        if units.len() > self.name_max {
            return Err(EncodingError::TooLong {
                len: units.len(),
                max: self.name_max,
            });
        }
        NodeName::from_units(&units).ok_or(EncodingError::InteriorNul)
    }
}
