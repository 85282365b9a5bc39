//! Result types for treatment-effect confidence intervals

use ate_core::PotentialOutcomes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-sided confidence interval for the average treatment effect
///
/// Both bounds are multiples of `1/N`; `numerators` holds the integers `k`
/// with `bound = k / N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TauInterval {
    /// Lower and upper bound on tau
    pub bounds: [f64; 2],
    /// Potential-outcomes tables witnessing the lower and upper bound
    pub allocations: [PotentialOutcomes; 2],
    /// Number of tables tested
    pub tables_examined: u64,
    /// Assignments behind all null distributions, summed over tables
    pub total_repetitions: u128,
    /// Effect numerators of the bounds
    pub numerators: [i64; 2],
    /// Number of subjects N
    pub subjects: u64,
    /// Coverage `1 - alpha`
    pub confidence_level: f64,
}

impl TauInterval {
    pub(crate) fn from_levels(
        lower: (i64, PotentialOutcomes),
        upper: (i64, PotentialOutcomes),
        subjects: u64,
        confidence_level: f64,
    ) -> Self {
        let tau = |k: i64| k as f64 / subjects as f64;
        Self {
            bounds: [tau(lower.0), tau(upper.0)],
            allocations: [lower.1, upper.1],
            tables_examined: 0,
            total_repetitions: 0,
            numerators: [lower.0, upper.0],
            subjects,
            confidence_level,
        }
    }

    pub(crate) fn with_diagnostics(mut self, tables_examined: u64, total_repetitions: u128) -> Self {
        self.tables_examined = tables_examined;
        self.total_repetitions = total_repetitions;
        self
    }

    /// Lower bound
    pub fn lower(&self) -> f64 {
        self.bounds[0]
    }

    /// Upper bound
    pub fn upper(&self) -> f64 {
        self.bounds[1]
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper() - self.lower()
    }

    /// Whether `tau` lies inside the interval
    pub fn contains(&self, tau: f64) -> bool {
        tau >= self.lower() && tau <= self.upper()
    }

    /// Table witnessing the lower bound
    pub fn lower_allocation(&self) -> &PotentialOutcomes {
        &self.allocations[0]
    }

    /// Table witnessing the upper bound
    pub fn upper_allocation(&self) -> &PotentialOutcomes {
        &self.allocations[1]
    }

    /// `[tables examined, total repetitions]`
    pub fn diagnostics(&self) -> [u128; 2] {
        [u128::from(self.tables_examined), self.total_repetitions]
    }

    /// Bounds scaled to subject counts, `[N * lower, N * upper]`
    pub fn scaled_bounds(&self) -> [i64; 2] {
        self.numerators
    }
}

impl fmt::Display for TauInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI for tau: [{}, {}] ([{}, {}]/{}), witnesses {} and {}",
            self.confidence_level * 100.0,
            self.lower(),
            self.upper(),
            self.numerators[0],
            self.numerators[1],
            self.subjects,
            self.allocations[0],
            self.allocations[1]
        )
    }
}
