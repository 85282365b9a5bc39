//! Monte-Carlo randomization distributions
//!
//! When enumerating every assignment is too expensive, the null distribution
//! is approximated by drawing `reps` assignments of `n` treated subjects
//! uniformly without replacement.

use crate::distribution::NullDistribution;
use crate::statistic::{difference_in_means, discrepancy};
use crate::traits::{validate_inputs, ObservedStatistic, RandomizationTest, TestOutcome};
use ate_core::{Error, ObservedTable, Result, UnitTable};
use rand::Rng;
use tracing::{instrument, trace};

/// Randomization test over sampled assignments
///
/// Borrows the caller's generator for its whole lifetime, so a seeded
/// generator reproduces every draw.
#[derive(Debug)]
pub struct MonteCarloTest<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    reps: u64,
    repetitions: u128,
}

impl<'r, R: Rng + ?Sized> MonteCarloTest<'r, R> {
    /// Create an engine drawing `reps` assignments per evaluation
    ///
    /// Fails with `InvalidArgument` when `reps` is 0.
    pub fn new(rng: &'r mut R, reps: u64) -> Result<Self> {
        if reps == 0 {
            return Err(Error::InvalidArgument(
                "reps must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            rng,
            reps,
            repetitions: 0,
        })
    }

    /// Draws per evaluation
    pub fn reps(&self) -> u64 {
        self.reps
    }
}

impl<R: Rng + ?Sized> RandomizationTest for MonteCarloTest<'_, R> {
    #[instrument(skip(self, units, observed),
                 fields(subjects = units.len(), treated = observed.treated(), reps = self.reps))]
    fn evaluate(
        &mut self,
        units: &UnitTable,
        tau: f64,
        observed: &ObservedTable,
        alpha: f64,
    ) -> Result<TestOutcome> {
        validate_inputs(units, observed, alpha)?;
        let table = units.summarize();
        let statistic = ObservedStatistic::new(&table, tau, observed);

        let rows = units.rows();
        let treated = observed.treated();
        let control = observed.control();
        let control_ones_total = units.control_ones();
        let draw_size = usize::try_from(treated).map_err(|_| {
            Error::ResourceExceeded(format!("{treated} treated subjects cannot be sampled"))
        })?;

        let mut distribution = NullDistribution::<u64>::new();
        for _ in 0..self.reps {
            let assignment = rand::seq::index::sample(&mut *self.rng, rows.len(), draw_size);
            let (mut treated_ones, mut treated_control_ones) = (0u64, 0u64);
            for i in assignment.iter() {
                let [control_outcome, treatment_outcome] = rows[i];
                treated_ones += u64::from(treatment_outcome);
                treated_control_ones += u64::from(control_outcome);
            }
            let control_ones = control_ones_total - treated_control_ones;
            let tau_hat = difference_in_means(treated_ones, treated, control_ones, control);
            distribution.add(discrepancy(tau_hat, tau), 1);
        }

        let outcome = statistic.conclude(&distribution, alpha, u128::from(self.reps))?;
        self.repetitions = self.repetitions.saturating_add(outcome.repetitions);
        trace!(
            table = %table,
            statistic = outcome.statistic,
            p_value = outcome.p_value,
            reject = outcome.reject,
            "monte carlo test"
        );
        Ok(outcome)
    }

    fn repetitions(&self) -> u128 {
        self.repetitions
    }

    fn name(&self) -> &'static str {
        "monte-carlo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::exact_outcome;
    use ate_core::expand_table;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_reps_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            MonteCarloTest::new(&mut rng, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_repetitions_accumulate() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut engine = MonteCarloTest::new(&mut rng, 500).unwrap();
        let observed = ObservedTable::new(1, 1, 2, 0).unwrap();
        let units = expand_table(&[0, 0, 3, 1]).unwrap();
        let first = engine.evaluate(&units, -0.75, &observed, 0.05).unwrap();
        let second = engine.evaluate(&units, -0.75, &observed, 0.05).unwrap();
        assert_eq!(first.repetitions, 500);
        assert_eq!(second.repetitions, 500);
        assert_eq!(engine.repetitions(), 1000);
        assert_eq!(engine.name(), "monte-carlo");
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
        let units = expand_table(&[13, 0, 2, 1]).unwrap();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut engine = MonteCarloTest::new(&mut rng, 2_000).unwrap();
            engine.evaluate(&units, -0.125, &observed, 0.05).unwrap()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_approximates_exact_p_value() {
        // Exact p-value is 1/60
        let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
        let units = expand_table(&[13, 0, 2, 1]).unwrap();
        let exact = exact_outcome(&units, -0.125, &observed, 0.05).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut engine = MonteCarloTest::new(&mut rng, 20_000).unwrap();
        let approx = engine.evaluate(&units, -0.125, &observed, 0.05).unwrap();
        assert!((approx.p_value - exact.p_value).abs() < 0.01);
        assert!(approx.reject);
        assert_eq!(approx.statistic, exact.statistic);
    }
}
