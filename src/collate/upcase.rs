//! Up-case table
//!
//! The volume's case-folding table: entry `i` is the folded form of code unit
//! `i`. Units at or beyond the table's extent have no folded form.

use crate::error::TableError;
use crate::types::CodeUnit;
use std::path::Path;

/// Largest table that can be indexed by a 16-bit code unit
const MAX_ENTRIES: usize = 0x10000;

/// Bounded up-case mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcaseTable {
    entries: Vec<CodeUnit>,
}

impl UpcaseTable {
    /// Build a table from folded values, indexed by code unit.
    ///
    /// Unit 0 terminates names, so it must fold to itself and nothing else
    /// may fold to it. Otherwise a name could compare equal to a proper
    /// prefix of itself.
    pub fn from_entries(entries: Vec<CodeUnit>) -> Result<Self, TableError> {
        if entries.len() > MAX_ENTRIES {
            return Err(TableError::TooLarge(entries.len()));
        }
        let misfolded = entries
            .iter()
            .enumerate()
            .find(|&(unit, &folded)| (unit == 0) != (folded == 0));
        if let Some((unit, &folded)) = misfolded {
            return Err(TableError::TerminatorMapping {
                unit: unit as CodeUnit,
                folded,
            });
        }
        Ok(UpcaseTable { entries })
    }

    /// Parse the raw little-endian layout used on disk.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        if bytes.len() % 2 != 0 {
            return Err(TableError::OddLength(bytes.len()));
        }
        let entries = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::from_entries(entries)
    }

    /// Read a raw table file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path)?;
        Self::from_le_bytes(&bytes)
    }

    /// Table mapping every covered unit to itself.
    pub fn identity(extent: usize) -> Self {
        let extent = extent.min(MAX_ENTRIES);
        UpcaseTable {
            entries: (0..extent).map(|u| u as CodeUnit).collect(),
        }
    }

    /// Identity table with ASCII lower-case letters folded to upper case.
    pub fn ascii(extent: usize) -> Self {
        let mut table = Self::identity(extent);
        for unit in u16::from(b'a')..=u16::from(b'z') {
            if let Some(slot) = table.entries.get_mut(unit as usize) {
                *slot = unit - 0x20;
            }
        }
        table
    }

    /// Number of code units covered by the table.
    pub fn extent(&self) -> usize {
        self.entries.len()
    }

    /// Folded form of `unit`, or `None` if outside the table.
    pub fn fold(&self, unit: CodeUnit) -> Option<CodeUnit> {
        self.entries.get(unit as usize).copied()
    }
}

impl Default for UpcaseTable {
    fn default() -> Self {
        Self::ascii(128)
    }
}
