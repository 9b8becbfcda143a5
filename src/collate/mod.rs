//! Name Collation
//!
//! Case-insensitive, locale-independent comparison of exFAT names. Folding is
//! driven entirely by the volume's up-case table; code units the table does
//! not cover compare by their raw value.

pub mod upcase;

pub use upcase::UpcaseTable;

use crate::types::CodeUnit;

/// Name comparator bound to one up-case table
#[derive(Debug, Clone, Default)]
pub struct Collator {
    table: UpcaseTable,
}

impl Collator {
    pub fn new(table: UpcaseTable) -> Self {
        Collator { table }
    }

    pub fn table(&self) -> &UpcaseTable {
        &self.table
    }

    /// Compare two code units.
    ///
    /// Negative if `a` sorts first, zero if equal after folding, positive
    /// otherwise. If either unit is outside the table both compare raw.
    pub fn compare_code_unit(&self, a: CodeUnit, b: CodeUnit) -> i32 {
        match (self.table.fold(a), self.table.fold(b)) {
            (Some(fa), Some(fb)) => i32::from(fa) - i32::from(fb),
            _ => i32::from(a) - i32::from(b),
        }
    }

    /// Compare two names unit by unit.
    ///
    /// The end of a slice, or a 0 unit, terminates a name. The terminators
    /// take part in the last comparison, so a proper prefix never compares
    /// equal to the longer name.
    pub fn compare_name(&self, a: &[CodeUnit], b: &[CodeUnit]) -> i32 {
        let mut i = 0;
        loop {
            let ua = a.get(i).copied().unwrap_or(0);
            let ub = b.get(i).copied().unwrap_or(0);
            if ua == 0 || ub == 0 {
                return self.compare_code_unit(ua, ub);
            }
            let rc = self.compare_code_unit(ua, ub);
            if rc != 0 {
                return rc;
            }
            i += 1;
        }
    }

    pub fn names_equal(&self, a: &[CodeUnit], b: &[CodeUnit]) -> bool {
        self.compare_name(a, b) == 0
    }
}
