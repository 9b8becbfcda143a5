//! Core types shared across the lookup core.

use std::fmt;

/// Maximum length of an exFAT file name, in 16-bit code units.
pub const EXFAT_NAME_MAX: usize = 255;

/// CodeUnit: one 16-bit unit of the on-disk name encoding (UTF-16LE on disk)
pub type CodeUnit = u16;

/// NodeId: index of a node inside a `NodeTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// NodeName: a validated, terminator-free sequence of code units
///
/// Holds at most `EXFAT_NAME_MAX` units and never contains a 0 unit, so the
/// end of the slice plays the role of the on-disk terminator.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeName {
    units: Vec<CodeUnit>,
}

impl NodeName {
    /// Build a name from raw code units.
    ///
    /// Returns `None` if the name is too long or contains a 0 unit.
    pub fn from_units(units: &[CodeUnit]) -> Option<Self> {
        if units.len() > EXFAT_NAME_MAX || units.contains(&0) {
            return None;
        }
        Some(NodeName {
            units: units.to_vec(),
        })
    }

    /// Build a name from a Rust string (UTF-16 encoding).
    pub fn new(s: &str) -> Option<Self> {
        let units: Vec<CodeUnit> = s.encode_utf16().collect();
        Self::from_units(&units)
    }

    pub fn as_units(&self) -> &[CodeUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Render the name for display, replacing unpaired surrogates.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl fmt::Debug for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
