//! Lazy enumeration of potential-outcomes tables
//!
//! Candidates are visited in canonical order: ascending `N00`, then `N01`,
//! then `N10`, with `N11` taking the remainder. The candidate domain is
//! `N00 <= N`, `N01 <= N - N00`, `N10 <= N - N00 - N01`, which covers every
//! table of `N` subjects. Each loop is further capped by the
//! observed margins the class can show up in (never-responders are observed
//! zeros, treatment-only responders are treated ones or control zeros,
//! control-only responders are treated zeros or control ones), which skips
//! candidates that could never pass the consistency filter.

use crate::consistency::is_consistent;
use ate_core::{Error, ObservedTable, PotentialOutcomes, Result};
use std::iter::FusedIterator;

/// Restartable iterator over tables consistent with an observed table
///
/// Clone a fresh enumerator to walk the sequence more than once. A clone
/// taken mid-way continues from the same position.
#[derive(Debug, Clone)]
pub struct TableEnumerator {
    observed: ObservedTable,
    total: u64,
    caps: [u64; 3],
    cursor: Option<[u64; 3]>,
}

impl TableEnumerator {
    /// Enumerate the tables consistent with `observed`
    pub fn new(observed: ObservedTable) -> Self {
        let total = observed.total();
        let caps = [
            observed.n10() + observed.n00(),
            observed.n11() + observed.n00(),
            observed.n10() + observed.n01(),
        ];
        Self {
            observed,
            total,
            caps,
            cursor: (total > 0).then_some([0, 0, 0]),
        }
    }

    /// The observed table being matched
    pub fn observed(&self) -> &ObservedTable {
        &self.observed
    }

    /// Number of subjects N
    pub fn total(&self) -> u64 {
        self.total
    }

    // Inclusive loop limits
    fn n00_limit(&self) -> u64 {
        self.total.min(self.caps[0])
    }

    fn n01_limit(&self, n00: u64) -> u64 {
        (self.total - n00).min(self.caps[1])
    }

    fn n10_limit(&self, n00: u64, n01: u64) -> u64 {
        (self.total - n00 - n01).min(self.caps[2])
    }

    fn advance(&self, [n00, n01, n10]: [u64; 3]) -> Option<[u64; 3]> {
        if n10 < self.n10_limit(n00, n01) {
            Some([n00, n01, n10 + 1])
        } else if n01 < self.n01_limit(n00) {
            Some([n00, n01 + 1, 0])
        } else if n00 < self.n00_limit() {
            Some([n00 + 1, 0, 0])
        } else {
            None
        }
    }
}

impl Iterator for TableEnumerator {
    type Item = PotentialOutcomes;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.cursor?;
            self.cursor = self.advance(current);

            let [n00, n01, n10] = current;
            let n11 = self.total - n00 - n01 - n10;
            let table = PotentialOutcomes::from_counts(n00, n01, n10, n11);
            if is_consistent(&table, &self.observed) {
                return Some(table);
            }
        }
    }
}

impl FusedIterator for TableEnumerator {}

/// Enumerate the tables consistent with an observed experiment
///
/// `total` must equal `n11 + n10 + n01 + n00`; all counts must be
/// non-negative and at least one subject must be present.
///
/// # Examples
///
/// ```rust
/// use ate_enumerate::enumerate_tables;
///
/// let tables: Vec<_> = enumerate_tables(4, 1, 1, 2, 0).unwrap().collect();
/// assert_eq!(tables.len(), 12);
/// assert!(tables.iter().all(|t| t.total() == 4));
/// ```
pub fn enumerate_tables(
    total: i64,
    n11: i64,
    n10: i64,
    n01: i64,
    n00: i64,
) -> Result<TableEnumerator> {
    let observed = ObservedTable::new(n11, n10, n01, n00)?;
    let total = u64::try_from(total).map_err(|_| Error::negative_count("N", total))?;
    if total != observed.total() {
        return Err(Error::size_mismatch(
            observed.total(),
            total,
            "subject total N versus n11 + n10 + n01 + n00",
        ));
    }
    Ok(TableEnumerator::new(observed))
}
