//! Expansion of a summary table into per-subject potential outcomes
//!
//! A [`UnitTable`] holds one row per subject. Rows are laid out as a single
//! arena in which every latent class owns one contiguous block, in the
//! canonical order (0,0), (0,1), (1,0), (1,1). The five class boundaries are
//! stored alongside the rows, so class ranges never have to be recovered by
//! scanning.

use crate::{Error, LatentClass, PotentialOutcomes, Result};
use std::ops::Range;

/// Explicit N×2 table of (control outcome, treatment outcome) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTable {
    rows: Vec<[u8; 2]>,
    boundaries: [usize; 5],
}

impl UnitTable {
    /// Expand a summary table into its unit table
    ///
    /// Fails with `ResourceExceeded` when the table has more subjects than
    /// can be addressed on this platform.
    pub fn from_summary(table: &PotentialOutcomes) -> Result<Self> {
        let mut boundaries = [0usize; 5];
        for class in LatentClass::ALL {
            let i = class.index();
            let count = usize::try_from(table.count(class)).map_err(|_| {
                Error::ResourceExceeded(format!("unit table for {table} does not fit in memory"))
            })?;
            boundaries[i + 1] = boundaries[i].checked_add(count).ok_or_else(|| {
                Error::ResourceExceeded(format!("unit table for {table} does not fit in memory"))
            })?;
        }

        let mut rows = vec![[0u8; 2]; boundaries[4]];
        for class in LatentClass::ALL {
            let i = class.index();
            rows[boundaries[i]..boundaries[i + 1]].fill(class.outcomes());
        }

        Ok(Self { rows, boundaries })
    }

    /// Number of subjects
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no subjects
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows as (control outcome, treatment outcome) pairs
    pub fn rows(&self) -> &[[u8; 2]] {
        &self.rows
    }

    /// Row range owned by one latent class
    pub fn class_range(&self, class: LatentClass) -> Range<usize> {
        let i = class.index();
        self.boundaries[i]..self.boundaries[i + 1]
    }

    /// Number of subjects in one latent class
    pub fn class_count(&self, class: LatentClass) -> u64 {
        self.class_range(class).len() as u64
    }

    /// Outcome under control for every subject
    pub fn control_outcomes(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(|row| row[0])
    }

    /// Outcome under treatment for every subject
    pub fn treatment_outcomes(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(|row| row[1])
    }

    /// Subjects whose outcome under control is 1
    pub fn control_ones(&self) -> u64 {
        self.class_count(LatentClass::ControlOnly) + self.class_count(LatentClass::Always)
    }

    /// Subjects whose outcome under treatment is 1
    pub fn treatment_ones(&self) -> u64 {
        self.class_count(LatentClass::TreatmentOnly) + self.class_count(LatentClass::Always)
    }

    /// Recover the summary table this unit table was expanded from
    pub fn summarize(&self) -> PotentialOutcomes {
        PotentialOutcomes::from_counts(
            self.class_count(LatentClass::Never),
            self.class_count(LatentClass::TreatmentOnly),
            self.class_count(LatentClass::ControlOnly),
            self.class_count(LatentClass::Always),
        )
    }
}

/// Expand a 4-element summary table `[N00, N01, N10, N11]` into unit rows
///
/// Fails with `InvalidArgument` when the slice does not have exactly four
/// elements or any element is negative.
///
/// # Examples
///
/// ```rust
/// use ate_core::expand_table;
///
/// let units = expand_table(&[1, 0, 1, 0]).unwrap();
/// assert_eq!(units.rows(), &[[0, 0], [1, 0]]);
/// ```
pub fn expand_table(counts: &[i64]) -> Result<UnitTable> {
    let table = PotentialOutcomes::from_slice(counts)?;
    UnitTable::from_summary(&table)
}
