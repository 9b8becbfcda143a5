//! In-memory volume image
//!
//! A `DirectoryLoader` backed by a prebuilt table of directories. Counts how
//! often each directory is loaded and can be told to fail specific loads,
//! which makes it the loader of choice for tests and benchmarks.

use crate::tree::loader::{DirectoryInfo, DirectoryLoader, Entry};
use crate::types::NodeName;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io;

const ROOT_LOCATION: u64 = 0;

/// Prebuilt directory table
#[derive(Debug)]
pub struct MemoryImage {
    directories: HashMap<u64, Vec<Entry>>,
    paths: HashMap<String, u64>,
    loads: Mutex<HashMap<u64, usize>>,
    failing: Mutex<HashSet<u64>>,
}

impl MemoryImage {
    pub fn builder() -> MemoryImageBuilder {
        MemoryImageBuilder::new()
    }

    pub fn root_location(&self) -> u64 {
        ROOT_LOCATION
    }

    /// Location of the directory created at `path` (exact spelling).
    pub fn location_of(&self, path: &str) -> Option<u64> {
        self.paths.get(&normalize(path)).copied()
    }

    /// Number of times the directory at `location` was loaded.
    pub fn load_count(&self, location: u64) -> usize {
        self.loads.lock().get(&location).copied().unwrap_or(0)
    }

    /// Total loads across all directories.
    pub fn total_loads(&self) -> usize {
        self.loads.lock().values().sum()
    }

    /// Make every subsequent load of `location` fail.
    pub fn fail_loads_of(&self, location: u64) {
        self.failing.lock().insert(location);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }
}

impl DirectoryLoader for MemoryImage {
    fn root(&self) -> Entry {
        Entry::directory(NodeName::default(), ROOT_LOCATION)
    }

    fn load(&self, dir: &DirectoryInfo) -> io::Result<Vec<Entry>> {
        if self.failing.lock().contains(&dir.location) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("injected read failure at location {}", dir.location),
            ));
        }
        *self.loads.lock().entry(dir.location).or_insert(0) += 1;
        match self.directories.get(&dir.location) {
            Some(entries) => Ok(entries.clone()),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no directory at location {}", dir.location),
            )),
        }
    }
}

/// Builder for `MemoryImage`
///
/// Paths are slash separated and taken verbatim; missing parent directories
/// are created on the way. Entries keep the order in which they were added.
#[derive(Debug)]
pub struct MemoryImageBuilder {
    directories: HashMap<u64, Vec<Entry>>,
    paths: HashMap<String, u64>,
    next_location: u64,
}

impl MemoryImageBuilder {
    fn new() -> Self {
        let mut directories = HashMap::new();
        directories.insert(ROOT_LOCATION, Vec::new());
        let mut paths = HashMap::new();
        paths.insert(String::new(), ROOT_LOCATION);
        MemoryImageBuilder {
            directories,
            paths,
            next_location: ROOT_LOCATION + 1,
        }
    }

    /// Add a file entry.
    pub fn file(mut self, path: &str, size: u64) -> Self {
        let (parent, name) = split_parent(path);
        let parent = self.ensure_dir(&parent);
        let location = self.allocate();
        self.push(parent, Entry::file(encode(name), size, location));
        self
    }

    /// Add a directory entry (and any missing parents).
    ///
    /// Adding the same path twice creates a second, distinct directory with
    /// the same name, like a corrupted volume would.
    pub fn dir(mut self, path: &str) -> Self {
        let (parent, name) = split_parent(path);
        let parent = self.ensure_dir(&parent);
        self.add_dir(parent, &normalize(path), name);
        self
    }

    pub fn build(self) -> MemoryImage {
        MemoryImage {
            directories: self.directories,
            paths: self.paths,
            loads: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    fn ensure_dir(&mut self, path: &str) -> u64 {
        if let Some(location) = self.paths.get(path) {
            return *location;
        }
        let (parent, name) = split_parent(path);
        let parent = self.ensure_dir(&parent);
        self.add_dir(parent, path, name)
    }

    fn add_dir(&mut self, parent: u64, path: &str, name: &str) -> u64 {
        let location = self.allocate();
        self.push(parent, Entry::directory(encode(name), location));
        self.directories.insert(location, Vec::new());
        self.paths.entry(path.to_string()).or_insert(location);
        location
    }

    fn push(&mut self, parent: u64, entry: Entry) {
        self.directories.entry(parent).or_default().push(entry);
    }

    fn allocate(&mut self) -> u64 {
        let location = self.next_location;
        self.next_location += 1;
        location
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn split_parent(path: &str) -> (String, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => (normalize(&trimmed[..pos]), &trimmed[pos + 1..]),
        None => (String::new(), trimmed),
    }
}

fn encode(name: &str) -> NodeName {
    match NodeName::new(name) {
        Some(name) => name,
        None => panic!("invalid image entry name {:?}", name),
    }
}
