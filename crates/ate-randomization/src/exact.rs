//! Exact randomization distributions
//!
//! Enumerating all `C(N, n)` assignments is unnecessary: subjects of the same
//! latent class are interchangeable, so an assignment is summarized by the
//! treated count of each class `(x00, x01, x10, x11)` with `Σ x = n`, and the
//! number of assignments sharing that summary is `Π C(N_c, x_c)`. The
//! difference in means depends only on the summary:
//!
//! ```text
//! a = x01 + x11                      (treated ones)
//! c = (N10 - x10) + (N11 - x11)      (control ones)
//! ```
//!
//! Weights are exact `u128` counts whenever `C(N, n)` fits; larger problems
//! use log-space probabilities.

use crate::distribution::NullDistribution;
use crate::statistic::{difference_in_means, discrepancy};
use crate::traits::{validate_inputs, ObservedStatistic, RandomizationTest, TestOutcome};
use ate_core::combinatorics::{assignment_count, checked_binomial, ln_binomial};
use ate_core::{Error, ObservedTable, Result, UnitTable};
use tracing::{instrument, trace};

/// Randomization test over every possible assignment
#[derive(Debug, Clone, Default)]
pub struct ExactTest {
    repetitions: u128,
}

impl ExactTest {
    /// Create an exact test engine
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomizationTest for ExactTest {
    #[instrument(skip(self, units, observed),
                 fields(subjects = units.len(), treated = observed.treated()))]
    fn evaluate(
        &mut self,
        units: &UnitTable,
        tau: f64,
        observed: &ObservedTable,
        alpha: f64,
    ) -> Result<TestOutcome> {
        let outcome = exact_outcome(units, tau, observed, alpha)?;
        self.repetitions = self.repetitions.saturating_add(outcome.repetitions);
        Ok(outcome)
    }

    fn repetitions(&self) -> u128 {
        self.repetitions
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Exact test of one table without an engine
///
/// Stateless counterpart of [`ExactTest::evaluate`], usable from several
/// threads at once.
pub fn exact_outcome(
    units: &UnitTable,
    tau: f64,
    observed: &ObservedTable,
    alpha: f64,
) -> Result<TestOutcome> {
    validate_inputs(units, observed, alpha)?;
    let table = units.summarize();
    let counts = table.as_array();
    let total = table.total();
    let treated = observed.treated();
    let statistic = ObservedStatistic::new(&table, tau, observed);

    let outcome = match assignment_count(total, treated) {
        Some(assignments) => {
            let rows = counts.map(|count| exact_row(count, treated));
            let mut distribution = NullDistribution::<u128>::new();
            for_each_class(counts, treated, |x| {
                let weight = (0..4).try_fold(1u128, |acc, c| {
                    rows[c][x[c] as usize].and_then(|w| acc.checked_mul(w))
                });
                let weight = weight.ok_or_else(|| {
                    Error::Computation(format!("permutation count overflow for class {x:?}"))
                })?;
                distribution.add(class_discrepancy(counts, x, observed, tau), weight);
                Ok(())
            })?;
            if distribution.total() != assignments {
                return Err(Error::Computation(format!(
                    "permutation classes cover {} of {assignments} assignments",
                    distribution.total()
                )));
            }
            statistic.conclude(&distribution, alpha, assignments)?
        }
        None => {
            let ln_assignments = ln_binomial(total, treated);
            let mut distribution = NullDistribution::<f64>::new();
            for_each_class(counts, treated, |x| {
                let ln_weight: f64 = (0..4).map(|c| ln_binomial(counts[c], x[c])).sum();
                let probability = (ln_weight - ln_assignments).exp();
                distribution.add(class_discrepancy(counts, x, observed, tau), probability);
                Ok(())
            })?;
            statistic.conclude(&distribution, alpha, u128::MAX)?
        }
    };

    trace!(
        table = %table,
        tau,
        statistic = outcome.statistic,
        p_value = outcome.p_value,
        reject = outcome.reject,
        "exact test"
    );
    Ok(outcome)
}

/// `C(count, k)` for `k = 0..=min(count, treated)`; `None` where it overflows
fn exact_row(count: u64, treated: u64) -> Vec<Option<u128>> {
    (0..=count.min(treated))
        .map(|k| checked_binomial::<u128>(count, k))
        .collect()
}

fn class_discrepancy(counts: [u64; 4], x: [u64; 4], observed: &ObservedTable, tau: f64) -> f64 {
    let [_, _, n10, n11] = counts;
    let [_, x01, x10, x11] = x;
    let treated_ones = x01 + x11;
    let control_ones = (n10 - x10) + (n11 - x11);
    let tau_hat = difference_in_means(
        treated_ones,
        observed.treated(),
        control_ones,
        observed.control(),
    );
    discrepancy(tau_hat, tau)
}

/// Visit every per-class treated count vector summing to `treated`
fn for_each_class<F>(counts: [u64; 4], treated: u64, mut visit: F) -> Result<()>
where
    F: FnMut([u64; 4]) -> Result<()>,
{
    let [n00, n01, n10, n11] = counts;
    for x00 in 0..=n00.min(treated) {
        let left = treated - x00;
        for x01 in 0..=n01.min(left) {
            let left = left - x01;
            for x10 in 0..=n10.min(left) {
                let x11 = left - x10;
                if x11 <= n11 {
                    visit([x00, x01, x10, x11])?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ate_core::expand_table;
    use approx::assert_relative_eq;

    /// Enumerate all assignments explicitly
    fn brute_force_p_value(counts: &[i64], tau: f64, observed: &ObservedTable) -> f64 {
        let units = expand_table(counts).unwrap();
        let big_n = units.len();
        let n = observed.treated() as usize;
        let t_obs = discrepancy(
            difference_in_means(
                observed.n11(),
                observed.treated(),
                observed.n01(),
                observed.control(),
            ),
            tau,
        );
        let mut hits = 0u64;
        let mut all = 0u64;
        for mask in 0u32..(1 << big_n) {
            if mask.count_ones() as usize != n {
                continue;
            }
            let (mut a, mut c) = (0u64, 0u64);
            for (i, row) in units.rows().iter().enumerate() {
                if mask & (1 << i) != 0 {
                    a += u64::from(row[1]);
                } else {
                    c += u64::from(row[0]);
                }
            }
            let d = discrepancy(
                difference_in_means(a, observed.treated(), c, observed.control()),
                tau,
            );
            all += 1;
            if d >= t_obs {
                hits += 1;
            }
        }
        hits as f64 / all as f64
    }

    #[test]
    fn test_matches_brute_force() {
        let observed = ObservedTable::new(2, 3, 1, 4).unwrap();
        for counts in [[3, 2, 1, 4], [4, 0, 1, 5], [2, 3, 2, 3], [5, 1, 0, 4]] {
            let units = expand_table(&counts).unwrap();
            let tau = units.summarize().average_effect();
            let outcome = exact_outcome(&units, tau, &observed, 0.05).unwrap();
            assert_eq!(outcome.repetitions, 252);
            assert_relative_eq!(
                outcome.p_value,
                brute_force_p_value(&counts, tau, &observed),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_published_witness_accepted() {
        let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
        let mut engine = ExactTest::new();
        for counts in [[14, 0, 1, 1], [1, 14, 0, 1]] {
            let units = expand_table(&counts).unwrap();
            let tau = units.summarize().average_effect();
            let outcome = engine.evaluate(&units, tau, &observed, 0.05).unwrap();
            assert!(!outcome.reject);
            assert_eq!(outcome.repetitions, 120);
            assert!(outcome.statistic <= outcome.critical_value);
        }
        assert_eq!(engine.repetitions(), 240);
        assert_eq!(engine.name(), "exact");
    }

    #[test]
    fn test_implausible_table_rejected() {
        // Two control-only responders would make an observed control one far
        // more likely than the single one seen among 14 controls.
        let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
        let units = expand_table(&[13, 0, 2, 1]).unwrap();
        let outcome = exact_outcome(&units, -2.0 / 16.0, &observed, 0.05).unwrap();
        assert!(outcome.reject);
        assert_relative_eq!(outcome.p_value, 1.0 / 60.0, epsilon = 1e-12);
        assert!(outcome.statistic > outcome.critical_value);
    }

    #[test]
    fn test_log_path_for_huge_tables() {
        // C(200, 100) does not fit in u128
        let observed = ObservedTable::new(50, 50, 50, 50).unwrap();
        let units = expand_table(&[100, 0, 0, 100]).unwrap();
        let outcome = exact_outcome(&units, 0.0, &observed, 0.05).unwrap();
        assert_eq!(outcome.repetitions, u128::MAX);
        assert!(!outcome.reject);
        assert!(outcome.p_value > 0.5);
    }

    #[test]
    fn test_rejects_invalid_alpha() {
        let observed = ObservedTable::new(1, 1, 2, 0).unwrap();
        let units = expand_table(&[0, 0, 3, 1]).unwrap();
        assert!(matches!(
            ExactTest::new().evaluate(&units, -0.5, &observed, 0.0),
            Err(Error::InvalidArgument(_))
        ));
    }
}
