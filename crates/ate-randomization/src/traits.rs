//! Randomization test interface
//!
//! A randomization test fixes a potential-outcomes table, re-randomizes the
//! treatment assignment and asks how extreme the observed statistic is under
//! that null distribution. Exact and Monte-Carlo engines share the trait
//! below so the confidence search can drive either.

use crate::distribution::{NullDistribution, Weight};
use crate::statistic::{difference_in_means, discrepancy, randomization_variance, studentize};
use ate_core::{Error, ObservedTable, PotentialOutcomes, Result, UnitTable};

/// Result of testing one potential-outcomes table at one effect level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    /// Studentized statistic of the observed assignment
    pub statistic: f64,
    /// `P(T >= statistic)` under the null distribution
    pub p_value: f64,
    /// The `1 - alpha` quantile of the studentized null distribution
    pub critical_value: f64,
    /// Whether the table is rejected at level alpha
    pub reject: bool,
    /// Assignments behind the null distribution
    pub repetitions: u128,
}

/// Randomization test of a fully specified potential-outcomes table
pub trait RandomizationTest {
    /// Test the hypothesis that `units` generated `observed` and that the
    /// average treatment effect is `tau`
    ///
    /// # Arguments
    /// * `units` - Per-subject potential outcomes under the null
    /// * `tau` - Hypothesized average treatment effect
    /// * `observed` - The observed 2×2 table
    /// * `alpha` - Significance level in (0, 1)
    fn evaluate(
        &mut self,
        units: &UnitTable,
        tau: f64,
        observed: &ObservedTable,
        alpha: f64,
    ) -> Result<TestOutcome>;

    /// Repetitions accumulated over every evaluation so far
    fn repetitions(&self) -> u128;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}

/// Shared validation: alpha in (0, 1), matching sizes, both arms non-empty
pub(crate) fn validate_inputs(
    units: &UnitTable,
    observed: &ObservedTable,
    alpha: f64,
) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::invalid_alpha(alpha));
    }
    if units.len() as u64 != observed.total() {
        return Err(Error::size_mismatch(
            observed.total(),
            units.len() as u64,
            "unit table rows versus observed subjects",
        ));
    }
    if !observed.has_both_arms() {
        return Err(Error::InvalidArgument(format!(
            "both arms need at least one subject ({observed})"
        )));
    }
    Ok(())
}

/// Observed discrepancy and variance for a table
pub(crate) struct ObservedStatistic {
    pub discrepancy: f64,
    pub variance: f64,
}

impl ObservedStatistic {
    pub fn new(table: &PotentialOutcomes, tau: f64, observed: &ObservedTable) -> Self {
        let tau_hat = difference_in_means(
            observed.n11(),
            observed.treated(),
            observed.n01(),
            observed.control(),
        );
        Self {
            discrepancy: discrepancy(tau_hat, tau),
            variance: randomization_variance(table, observed.treated()),
        }
    }

    /// Turn a null distribution of raw discrepancies into a test outcome
    ///
    /// The variance is fixed by the table, so studentizing is a monotone
    /// rescaling and the p-value is taken on the raw discrepancies. A
    /// zero-variance table never rejects.
    pub fn conclude<W: Weight>(
        &self,
        distribution: &NullDistribution<W>,
        alpha: f64,
        repetitions: u128,
    ) -> Result<TestOutcome> {
        let quantile = distribution.quantile(1.0 - alpha)?;
        let (p_value, reject) = if self.variance > 0.0 {
            let p = distribution.tail_probability(self.discrepancy)?;
            (p, p <= alpha)
        } else {
            (1.0, false)
        };
        Ok(TestOutcome {
            statistic: studentize(self.discrepancy, self.variance),
            p_value,
            critical_value: studentize(quantile, self.variance),
            reject,
            repetitions,
        })
    }
}
