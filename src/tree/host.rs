//! Host directory loader
//!
//! Presents a directory of the host filesystem as a volume: each host
//! directory becomes a node directory, populated with `read_dir` order as the
//! on-disk order. Entries whose names cannot be stored as exFAT names are
//! skipped.

use crate::tree::loader::{DirectoryInfo, DirectoryLoader, Entry};
use crate::types::{NodeName, EXFAT_NAME_MAX};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Host paths handed out as node locations
#[derive(Debug, Default)]
struct Locations {
    /// Host path per location; location 0 is the root
    paths: Vec<PathBuf>,
    index: HashMap<PathBuf, u64>,
}

impl Locations {
    /// Location of `path`, reusing the one given out on an earlier load.
    fn register(&mut self, path: PathBuf) -> u64 {
        if let Some(location) = self.index.get(&path) {
            return *location;
        }
        let location = self.paths.len() as u64;
        self.index.insert(path.clone(), location);
        self.paths.push(path);
        location
    }
}

/// Loader reading directories from the host filesystem
#[derive(Debug)]
pub struct HostDirLoader {
    locations: RwLock<Locations>,
}

impl HostDirLoader {
    pub fn new(root: &Path) -> io::Result<Self> {
        let root = dunce::canonicalize(root)?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        let mut locations = Locations::default();
        locations.register(root);
        Ok(HostDirLoader {
            locations: RwLock::new(locations),
        })
    }

    pub fn root_path(&self) -> PathBuf {
        self.locations.read().paths[0].clone()
    }

    /// Host path behind a node location.
    pub fn host_path(&self, location: u64) -> Option<PathBuf> {
        self.locations.read().paths.get(location as usize).cloned()
    }

    /// Number of host paths that have been given a location.
    pub fn known_locations(&self) -> usize {
        self.locations.read().paths.len()
    }
}

impl DirectoryLoader for HostDirLoader {
    fn root(&self) -> Entry {
        Entry::directory(NodeName::default(), 0)
    }

    fn load(&self, dir: &DirectoryInfo) -> io::Result<Vec<Entry>> {
        let path = self.host_path(dir.location).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown location {}", dir.location),
            )
        })?;

        // registered only once the whole directory has been read
        let mut found = Vec::new();
        for item in std::fs::read_dir(&path)? {
            let item = item?;
            let file_name = item.file_name();
            let Some(text) = file_name.to_str() else {
                warn!(dir = %path.display(), name = ?file_name, "Skipping non UTF-8 name");
                continue;
            };
            let Some(name) = NodeName::new(text) else {
                warn!(
                    dir = %path.display(),
                    name = text,
                    max = EXFAT_NAME_MAX,
                    "Skipping name that does not fit an exFAT entry"
                );
                continue;
            };

            let metadata = std::fs::metadata(item.path())?;
            found.push((name, item.path(), metadata));
        }

        let mut locations = self.locations.write();
        let entries: Vec<Entry> = found
            .into_iter()
            .map(|(name, host_path, metadata)| {
                let location = locations.register(host_path);
                if metadata.is_dir() {
                    Entry::directory(name, location)
                } else {
                    Entry::file(name, metadata.len(), location)
                }
            })
            .collect();
        drop(locations);

        debug!(dir = %path.display(), entries = entries.len(), "Read host directory");
        Ok(entries)
    }
}
