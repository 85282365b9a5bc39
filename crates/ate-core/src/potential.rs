//! Latent potential-outcomes summary tables

use crate::observed::non_negative;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latent class of a subject, by its (control, treatment) potential outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LatentClass {
    /// Outcome 0 under both arms
    Never,
    /// Outcome 0 under control, 1 under treatment
    TreatmentOnly,
    /// Outcome 1 under control, 0 under treatment
    ControlOnly,
    /// Outcome 1 under both arms
    Always,
}

impl LatentClass {
    /// All classes in canonical block order
    pub const ALL: [LatentClass; 4] = [
        LatentClass::Never,
        LatentClass::TreatmentOnly,
        LatentClass::ControlOnly,
        LatentClass::Always,
    ];

    /// Position of the class in canonical order
    pub const fn index(self) -> usize {
        match self {
            LatentClass::Never => 0,
            LatentClass::TreatmentOnly => 1,
            LatentClass::ControlOnly => 2,
            LatentClass::Always => 3,
        }
    }

    /// The (control outcome, treatment outcome) pair of this class
    pub const fn outcomes(self) -> [u8; 2] {
        match self {
            LatentClass::Never => [0, 0],
            LatentClass::TreatmentOnly => [0, 1],
            LatentClass::ControlOnly => [1, 0],
            LatentClass::Always => [1, 1],
        }
    }

    /// Individual treatment effect of a subject in this class
    pub const fn effect(self) -> i8 {
        let [control, treatment] = self.outcomes();
        treatment as i8 - control as i8
    }
}

/// Summary table `Nt = (N00, N01, N10, N11)` of potential outcomes
///
/// `Nij` counts subjects with outcome `i` under control and `j` under
/// treatment. Only one of the two outcomes is ever observed per subject, so
/// these tables are latent; the enumerator produces the ones compatible with
/// an observed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PotentialOutcomes {
    n00: u64,
    n01: u64,
    n10: u64,
    n11: u64,
}

impl PotentialOutcomes {
    /// Create a table from signed counts, rejecting negatives
    pub fn new(n00: i64, n01: i64, n10: i64, n11: i64) -> Result<Self> {
        Ok(Self {
            n00: non_negative("N00", n00)?,
            n01: non_negative("N01", n01)?,
            n10: non_negative("N10", n10)?,
            n11: non_negative("N11", n11)?,
        })
    }

    /// Create a table from a slice that must hold exactly four counts
    pub fn from_slice(counts: &[i64]) -> Result<Self> {
        match counts {
            [n00, n01, n10, n11] => Self::new(*n00, *n01, *n10, *n11),
            _ => Err(Error::InvalidArgument(format!(
                "table must have 4 entries (N00, N01, N10, N11), got {}",
                counts.len()
            ))),
        }
    }

    /// Create a table from counts already known to be valid
    pub const fn from_counts(n00: u64, n01: u64, n10: u64, n11: u64) -> Self {
        Self { n00, n01, n10, n11 }
    }

    /// Subjects with outcome 0 under both arms
    pub fn n00(&self) -> u64 {
        self.n00
    }

    /// Subjects with outcome 0 under control and 1 under treatment
    pub fn n01(&self) -> u64 {
        self.n01
    }

    /// Subjects with outcome 1 under control and 0 under treatment
    pub fn n10(&self) -> u64 {
        self.n10
    }

    /// Subjects with outcome 1 under both arms
    pub fn n11(&self) -> u64 {
        self.n11
    }

    /// Count for one latent class
    pub fn count(&self, class: LatentClass) -> u64 {
        match class {
            LatentClass::Never => self.n00,
            LatentClass::TreatmentOnly => self.n01,
            LatentClass::ControlOnly => self.n10,
            LatentClass::Always => self.n11,
        }
    }

    /// Counts in canonical order `[N00, N01, N10, N11]`
    pub fn as_array(&self) -> [u64; 4] {
        [self.n00, self.n01, self.n10, self.n11]
    }

    /// Total number of subjects
    pub fn total(&self) -> u64 {
        self.n00 + self.n01 + self.n10 + self.n11
    }

    /// Subjects whose outcome under treatment is 1
    pub fn treatment_ones(&self) -> u64 {
        self.n01 + self.n11
    }

    /// Subjects whose outcome under control is 1
    pub fn control_ones(&self) -> u64 {
        self.n10 + self.n11
    }

    /// Sum of individual effects, `N01 - N10`
    ///
    /// The average treatment effect of the table is this numerator over N.
    pub fn effect_numerator(&self) -> i64 {
        self.n01 as i64 - self.n10 as i64
    }

    /// Average treatment effect `(N01 - N10) / N`
    pub fn average_effect(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.effect_numerator() as f64 / total as f64
    }
}

impl From<PotentialOutcomes> for [u64; 4] {
    fn from(table: PotentialOutcomes) -> Self {
        table.as_array()
    }
}

impl fmt::Display for PotentialOutcomes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.n00, self.n01, self.n10, self.n11)
    }
}
