//! Observed 2×2 table of a two-arm experiment with a binary outcome

use crate::{Error, PotentialOutcomes, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of subjects by (treatment arm, observed outcome)
///
/// - `n11`: assigned to treatment, outcome 1
/// - `n10`: assigned to treatment, outcome 0
/// - `n01`: assigned to control, outcome 1
/// - `n00`: assigned to control, outcome 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedTable {
    n11: u64,
    n10: u64,
    n01: u64,
    n00: u64,
}

impl ObservedTable {
    /// Create an observed table from signed counts
    ///
    /// Fails with `InvalidArgument` when any count is negative or when the
    /// table is empty.
    pub fn new(n11: i64, n10: i64, n01: i64, n00: i64) -> Result<Self> {
        let table = Self {
            n11: non_negative("n11", n11)?,
            n10: non_negative("n10", n10)?,
            n01: non_negative("n01", n01)?,
            n00: non_negative("n00", n00)?,
        };
        table.checked_total()?;
        Ok(table)
    }

    /// Create an observed table from floating-point counts
    ///
    /// Counts read from numeric columns often arrive as `f64`; anything that
    /// is not a finite whole number is rejected.
    pub fn from_f64(n11: f64, n10: f64, n01: f64, n00: f64) -> Result<Self> {
        Self::new(
            integral("n11", n11)?,
            integral("n10", n10)?,
            integral("n01", n01)?,
            integral("n00", n00)?,
        )
    }

    /// Create a table from counts already known to be valid
    ///
    /// The caller guarantees at least one non-zero count.
    pub const fn from_counts(n11: u64, n10: u64, n01: u64, n00: u64) -> Self {
        Self { n11, n10, n01, n00 }
    }

    /// Treated subjects with outcome 1
    pub fn n11(&self) -> u64 {
        self.n11
    }

    /// Treated subjects with outcome 0
    pub fn n10(&self) -> u64 {
        self.n10
    }

    /// Control subjects with outcome 1
    pub fn n01(&self) -> u64 {
        self.n01
    }

    /// Control subjects with outcome 0
    pub fn n00(&self) -> u64 {
        self.n00
    }

    /// Total number of subjects N
    pub fn total(&self) -> u64 {
        self.n11 + self.n10 + self.n01 + self.n00
    }

    /// Size of the treatment arm
    pub fn treated(&self) -> u64 {
        self.n11 + self.n10
    }

    /// Size of the control arm
    pub fn control(&self) -> u64 {
        self.n01 + self.n00
    }

    /// Subjects whose observed outcome is 1
    pub fn observed_ones(&self) -> u64 {
        self.n11 + self.n01
    }

    /// Subjects whose observed outcome is 0
    pub fn observed_zeros(&self) -> u64 {
        self.n10 + self.n00
    }

    /// Whether both arms contain at least one subject
    pub fn has_both_arms(&self) -> bool {
        self.treated() > 0 && self.control() > 0
    }

    /// Unbiased difference-in-means estimate `n11/n - n01/m`
    ///
    /// `None` when either arm is empty.
    pub fn point_estimate(&self) -> Option<f64> {
        if !self.has_both_arms() {
            return None;
        }
        Some(
            self.n11 as f64 / self.treated() as f64
                - self.n01 as f64 / self.control() as f64,
        )
    }

    /// The potential-outcomes table in which every subject's unobserved
    /// outcome equals the observed one (no effect for anybody)
    pub fn sharp_null_table(&self) -> PotentialOutcomes {
        PotentialOutcomes::from_counts(self.observed_zeros(), 0, 0, self.observed_ones())
    }

    fn checked_total(&self) -> Result<u64> {
        let total = self
            .n11
            .checked_add(self.n10)
            .and_then(|t| t.checked_add(self.n01))
            .and_then(|t| t.checked_add(self.n00))
            .ok_or_else(|| Error::InvalidArgument("total subject count overflows".to_string()))?;
        if total == 0 {
            return Err(Error::InvalidArgument(
                "observed table must contain at least one subject".to_string(),
            ));
        }
        Ok(total)
    }
}

impl fmt::Display for ObservedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "treated [1: {}, 0: {}] control [1: {}, 0: {}]",
            self.n11, self.n10, self.n01, self.n00
        )
    }
}

pub(crate) fn non_negative(name: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::negative_count(name, value))
}

fn integral(name: &str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(Error::non_integral(name, value));
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_margins() {
        let obs = ObservedTable::new(1, 1, 1, 13).unwrap();
        assert_eq!(obs.total(), 16);
        assert_eq!(obs.treated(), 2);
        assert_eq!(obs.control(), 14);
        assert_eq!(obs.observed_ones(), 2);
        assert_eq!(obs.observed_zeros(), 14);
    }

    #[test]
    fn test_point_estimate() {
        let obs = ObservedTable::new(1, 1, 1, 13).unwrap();
        assert_relative_eq!(obs.point_estimate().unwrap(), 0.5 - 1.0 / 14.0, epsilon = 1e-15);

        let no_treated = ObservedTable::new(0, 0, 0, 10).unwrap();
        assert!(no_treated.point_estimate().is_none());
    }

    #[test]
    fn test_negative_counts_rejected() {
        let err = ObservedTable::new(-5, 10, 10, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("n11"));

        assert!(ObservedTable::new(5, 10, 10, -1).is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            ObservedTable::new(0, 0, 0, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_f64() {
        let obs = ObservedTable::from_f64(2.0, 6.0, 8.0, 0.0).unwrap();
        assert_eq!(obs, ObservedTable::new(2, 6, 8, 0).unwrap());

        assert!(ObservedTable::from_f64(2.5, 6.0, 8.0, 0.0).is_err());
        assert!(ObservedTable::from_f64(f64::NAN, 6.0, 8.0, 0.0).is_err());
        assert!(ObservedTable::from_f64(1.0, -6.0, 8.0, 0.0).is_err());
    }

    #[test]
    fn test_sharp_null_table() {
        let obs = ObservedTable::new(6, 0, 11, 3).unwrap();
        let nt = obs.sharp_null_table();
        assert_eq!(nt.as_array(), [3, 0, 0, 17]);
        assert_eq!(nt.effect_numerator(), 0);
    }
}
