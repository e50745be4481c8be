//! A work limit for lookup expansion.
//!
//! Lookups and subtables can be referenced by many offsets at once,
//! so a small table can describe an enormous amount of expanded data.

use crate::decode::Notes;

/// The maximum number of entries a single GSUB or GPOS table can expand into.
///
/// Entries are lookup subtables, covered glyphs, sequence glyphs and ligature components.
pub const MAX_EXPANDED_ENTRIES: usize = 1 << 20;

/// Tracks how much expansion work is left.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExpansionBudget {
    limit: usize,
    remaining: usize,
    exhausted: bool,
}

impl ExpansionBudget {
    #[inline]
    pub fn new(limit: usize) -> Self {
        ExpansionBudget { limit, remaining: limit, exhausted: false }
    }

    /// Spends `n` entries.
    ///
    /// Returns `false` and exhausts the budget when fewer than `n` are left.
    #[inline]
    pub fn take(&mut self, n: usize) -> bool {
        if self.exhausted || n > self.remaining {
            self.remaining = 0;
            self.exhausted = true;
            return false;
        }

        self.remaining -= n;
        true
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Adds a note when the budget ran out.
    pub fn finish(&self, what: &str, notes: &mut Notes) {
        if self.exhausted {
            notes.push(format!("{} expansion stopped after {} entries", what, self.limit));
        }
    }
}

impl Default for ExpansionBudget {
    #[inline]
    fn default() -> Self {
        ExpansionBudget::new(MAX_EXPANDED_ENTRIES)
    }
}
