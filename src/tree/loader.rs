//! Directory population interface
//!
//! The tree never reads storage itself. When a directory is opened for the
//! first time its entries are requested from a `DirectoryLoader`, which stands
//! in for cluster-chain reading and directory-entry decoding.

use crate::types::{NodeId, NodeKind, NodeName};
use std::io;
use std::sync::Arc;

/// Directory entry produced by a loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: NodeName,
    pub kind: NodeKind,
    pub size: u64,
    pub location: u64,
}

impl Entry {
    pub fn file(name: NodeName, size: u64, location: u64) -> Self {
        Entry {
            name,
            kind: NodeKind::File,
            size,
            location,
        }
    }

    pub fn directory(name: NodeName, location: u64) -> Self {
        Entry {
            name,
            kind: NodeKind::Directory,
            size: 0,
            location,
        }
    }
}

/// Directory being populated
#[derive(Debug, Clone)]
pub struct DirectoryInfo {
    pub id: NodeId,
    pub name: NodeName,
    pub location: u64,
    pub size: u64,
}

/// Source of directory contents
pub trait DirectoryLoader: Send + Sync {
    /// Entry describing the root directory.
    fn root(&self) -> Entry;

    /// Entries of `dir` in on-disk order.
    fn load(&self, dir: &DirectoryInfo) -> io::Result<Vec<Entry>>;
}

impl<T: DirectoryLoader + ?Sized> DirectoryLoader for Arc<T> {
    fn root(&self) -> Entry {
        (**self).root()
    }

    fn load(&self, dir: &DirectoryInfo) -> io::Result<Vec<Entry>> {
        (**self).load(dir)
    }
}

impl<T: DirectoryLoader + ?Sized> DirectoryLoader for Box<T> {
    fn root(&self) -> Entry {
        (**self).root()
    }

    fn load(&self, dir: &DirectoryInfo) -> io::Result<Vec<Entry>> {
        (**self).load(dir)
    }
}
