//! Error types

use thiserror::Error;

/// Path component could not be turned into a node name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Name too long: {len} code units (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("Invalid UTF-8 in path component")]
    InvalidUtf8,

    #[error("Empty path component")]
    Empty,

    #[error("Path component contains NUL")]
    InteriorNul,
}

/// Lookup and iteration errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No such entry: {component}")]
    NotFound { component: String },

    #[error("Not a directory: {component}")]
    NotADirectory { component: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Up-case table errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Up-case table has odd length: {0} bytes")]
    OddLength(usize),

    #[error("Up-case table too large: {0} entries")]
    TooLarge(usize),

    #[error("Up-case table maps {unit:#06x} to {folded:#06x}; only 0 may fold to 0")]
    TerminatorMapping { unit: u16, folded: u16 },

    #[error("Failed to read up-case table: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and tooling errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Up-case table error: {0}")]
    Table(#[from] TableError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
