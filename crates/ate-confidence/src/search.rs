//! Confidence bounds by inverting randomization tests
//!
//! A value `tau = k/N` belongs to the confidence set when some potential
//! outcomes table with effect `tau`, consistent with the observation, is not
//! rejected by its randomization test. The search starts at the effect level
//! nearest the point estimate and walks outward in both directions, stopping
//! on each side at the first level none of whose tables is accepted. Every
//! table of a visited level is tested; the level's witness is its last
//! accepted table in canonical order.

use crate::config::{TauCiConfig, TestMode};
use crate::types::TauInterval;
use ate_core::combinatorics::{assignment_count, ln_binomial};
use ate_core::{Error, ObservedTable, PotentialOutcomes, Result, UnitTable};
use ate_enumerate::{EffectLevels, TableEnumerator};
use ate_randomization::{ExactTest, MonteCarloTest, RandomizationTest};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Driver for the two-sided confidence-bound search
#[derive(Debug, Clone)]
pub struct TauCiSearch {
    config: TauCiConfig,
}

/// Running counters of one search
#[derive(Debug, Default)]
struct Progress {
    tables_examined: u64,
    repetitions: u128,
}

impl TauCiSearch {
    /// Create a search with a validated configuration
    pub fn new(config: TauCiConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &TauCiConfig {
        &self.config
    }

    /// Compute the `1 - alpha` confidence interval for `observed`
    ///
    /// `rng` is only drawn from in Monte-Carlo mode, both for sampling tables
    /// (when more than `max_combinations` are feasible) and for sampling
    /// assignments.
    ///
    /// # Errors
    /// * `ResourceExceeded` - exact mode with `C(N, n) > max_combinations`,
    ///   Monte-Carlo mode with `max_combinations == 0`, an exhausted budget, or
    ///   sampled tables that are all rejected
    /// * `Computation` - exact mode rejected every table it examined
    #[instrument(skip(self, rng), fields(
        n11 = observed.n11(),
        n10 = observed.n10(),
        n01 = observed.n01(),
        n00 = observed.n00(),
        mode = ?self.config.mode(),
    ))]
    pub fn run<R: Rng + ?Sized>(&self, observed: &ObservedTable, rng: &mut R) -> Result<TauInterval> {
        let total = observed.total();
        let treated = observed.treated();

        if self.config.mode() == TestMode::Exact {
            self.check_assignment_count(total, treated)?;
        }
        let point_estimate = match observed.point_estimate() {
            Some(estimate) => estimate,
            None => {
                debug!("An arm is empty; returning the sharp-null interval");
                return Ok(self.degenerate(observed));
            }
        };

        let tables = TableEnumerator::new(*observed);
        let levels = match self.config.mode() {
            TestMode::Exact => EffectLevels::collect(tables),
            TestMode::MonteCarlo => {
                EffectLevels::sample(tables, self.config.max_combinations(), rng)?
            }
        };
        let (covered, progress) = match self.config.mode() {
            TestMode::Exact => {
                let mut engine = ExactTest::new();
                self.walk(&levels, observed, point_estimate, &mut engine)?
            }
            TestMode::MonteCarlo => {
                let mut engine = MonteCarloTest::new(rng, self.config.reps())?;
                self.walk(&levels, observed, point_estimate, &mut engine)?
            }
        };

        let (Some((&lower, &lower_table)), Some((&upper, &upper_table))) =
            (covered.first_key_value(), covered.last_key_value())
        else {
            let message = format!(
                "no effect level accepted after {} tables for {observed}",
                progress.tables_examined
            );
            return Err(match self.config.mode() {
                TestMode::Exact => Error::Computation(message),
                TestMode::MonteCarlo => Error::ResourceExceeded(format!(
                    "{message}; raise max_combinations to sample more tables"
                )),
            });
        };

        let interval = TauInterval::from_levels(
            (lower, lower_table),
            (upper, upper_table),
            total,
            self.config.confidence_level(),
        )
        .with_diagnostics(progress.tables_examined, progress.repetitions);
        debug!(
            lower = interval.lower(),
            upper = interval.upper(),
            tables = progress.tables_examined,
            "Confidence interval found"
        );
        Ok(interval)
    }

    fn check_assignment_count(&self, total: u64, treated: u64) -> Result<()> {
        let limit = self.config.max_combinations();
        match assignment_count(total, treated) {
            Some(count) if count <= u128::from(limit) => Ok(()),
            Some(count) => Err(Error::capacity(
                count,
                limit,
                "exact inversion (raise max_combinations to C(N, n))",
            )),
            None => Err(Error::capacity(
                format!("about e^{:.1}", ln_binomial(total, treated)),
                limit,
                "exact inversion",
            )),
        }
    }

    /// Walk levels outward from the one nearest the point estimate
    fn walk<E: RandomizationTest>(
        &self,
        levels: &EffectLevels,
        observed: &ObservedTable,
        point_estimate: f64,
        engine: &mut E,
    ) -> Result<(BTreeMap<i64, PotentialOutcomes>, Progress)> {
        let total = levels.total();
        let mut covered = BTreeMap::new();
        let mut progress = Progress::default();
        let Some(start) = levels.nearest_level(point_estimate * total as f64) else {
            return Ok((covered, progress));
        };
        debug!(start, point_estimate, "Starting outward search");

        let downward = std::iter::once(start).chain(levels.levels_below(start));
        for k in downward {
            match self.scan_level(levels, k, observed, engine, &mut progress)? {
                Some(witness) => {
                    covered.insert(k, witness);
                }
                None => break,
            }
        }
        for k in levels.levels_above(start) {
            match self.scan_level(levels, k, observed, engine, &mut progress)? {
                Some(witness) => {
                    covered.insert(k, witness);
                }
                None => break,
            }
        }
        Ok((covered, progress))
    }

    /// Test every table of level `k`; the last accepted one is the witness
    fn scan_level<E: RandomizationTest>(
        &self,
        levels: &EffectLevels,
        k: i64,
        observed: &ObservedTable,
        engine: &mut E,
        progress: &mut Progress,
    ) -> Result<Option<PotentialOutcomes>> {
        let tables = levels.level(k).unwrap_or(&[]);
        let tau = k as f64 / levels.total() as f64;

        #[cfg(feature = "parallel")]
        {
            if self.config.mode() == TestMode::Exact {
                return self.scan_level_parallel(tables, k, tau, observed, progress);
            }
        }

        let mut witness = None;
        for table in tables {
            self.config.budget().check(progress.tables_examined + 1)?;
            let units = UnitTable::from_summary(table)?;
            let outcome = engine.evaluate(&units, tau, observed, self.config.alpha())?;
            progress.tables_examined += 1;
            progress.repetitions = progress.repetitions.saturating_add(outcome.repetitions);
            if !outcome.reject {
                witness = Some(*table);
            }
        }
        debug!(
            k,
            tables = tables.len(),
            covered = witness.is_some(),
            engine = engine.name(),
            "Scanned effect level"
        );
        Ok(witness)
    }

    #[cfg(feature = "parallel")]
    fn scan_level_parallel(
        &self,
        tables: &[PotentialOutcomes],
        k: i64,
        tau: f64,
        observed: &ObservedTable,
        progress: &mut Progress,
    ) -> Result<Option<PotentialOutcomes>> {
        use rayon::prelude::*;

        self.config
            .budget()
            .check(progress.tables_examined + tables.len() as u64)?;
        let alpha = self.config.alpha();
        let outcomes = tables
            .par_iter()
            .map(|table| {
                let units = UnitTable::from_summary(table)?;
                ate_randomization::exact_outcome(&units, tau, observed, alpha)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut witness = None;
        for (table, outcome) in tables.iter().zip(&outcomes) {
            progress.tables_examined += 1;
            progress.repetitions = progress.repetitions.saturating_add(outcome.repetitions);
            if !outcome.reject {
                witness = Some(*table);
            }
        }
        debug!(
            k,
            tables = tables.len(),
            covered = witness.is_some(),
            "Scanned effect level in parallel"
        );
        Ok(witness)
    }

    /// Zero-width interval at 0 witnessed by the sharp-null table, for an
    /// experiment with an empty arm
    fn degenerate(&self, observed: &ObservedTable) -> TauInterval {
        let sharp = observed.sharp_null_table();
        TauInterval::from_levels(
            (0, sharp),
            (0, sharp),
            observed.total(),
            self.config.confidence_level(),
        )
    }
}

/// Two-sided `1 - alpha` confidence interval for the average treatment effect
///
/// # Arguments
/// * `n11`, `n10` - Treated subjects with outcome 1 and 0
/// * `n01`, `n00` - Control subjects with outcome 1 and 0
/// * `alpha` - Significance level in (0, 1)
/// * `exact` - Enumerate every assignment (`true`) or sample `reps` of them
/// * `max_combinations` - Exact mode: largest acceptable `C(N, n)`;
///   Monte-Carlo mode: most tables examined
/// * `reps` - Monte-Carlo draws per table, at least 1
/// * `rng` - Random source for Monte-Carlo mode
///
/// # Examples
///
/// ```rust
/// use ate_confidence::{tau_twosided_ci, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS};
///
/// let mut rng = rand::thread_rng();
/// let ci = tau_twosided_ci(1, 1, 1, 13, 0.05, true, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS, &mut rng)
///     .unwrap();
/// assert_eq!(ci.bounds, [-0.0625, 0.875]);
/// assert_eq!(ci.tables_examined, 99);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn tau_twosided_ci<R: Rng + ?Sized>(
    n11: i64,
    n10: i64,
    n01: i64,
    n00: i64,
    alpha: f64,
    exact: bool,
    max_combinations: u64,
    reps: u64,
    rng: &mut R,
) -> Result<TauInterval> {
    let observed = ObservedTable::new(n11, n10, n01, n00)?;
    let config = TauCiConfig::new(alpha, TestMode::from(exact), max_combinations, reps)?;
    TauCiSearch::new(config).run(&observed, rng)
}
