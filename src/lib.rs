//! exFAT Lookup: path resolution over a cached node tree
//!
//! Resolves slash-separated paths to reference-counted nodes of an in-memory
//! cache that mirrors on-disk exFAT directories. Names are compared with the
//! volume's up-case table; directories are populated lazily by a
//! `DirectoryLoader`.

pub mod collate;
pub mod config;
pub mod encoding;
pub mod error;
pub mod iter;
pub mod logging;
pub mod lookup;
pub mod tooling;
pub mod tree;
pub mod types;

pub use collate::{Collator, UpcaseTable};
pub use encoding::{ComponentEncoder, Utf8Encoder};
pub use error::{EncodingError, LookupError};
pub use iter::DirIterator;
pub use lookup::{Components, Volume};
pub use tree::{DirectoryLoader, NodeRef, NodeTree};
pub use types::{NodeId, NodeKind, NodeName, EXFAT_NAME_MAX};
