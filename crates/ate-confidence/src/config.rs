//! Configuration of the confidence-bound search

use ate_core::{Error, Result, SearchBudget};

/// Conventional cap on assignments (exact mode) or tables (Monte-Carlo mode)
pub const DEFAULT_MAX_COMBINATIONS: u64 = 100_000;

/// Conventional number of Monte-Carlo draws per table
pub const DEFAULT_REPS: u64 = 1_000;

/// How each table's null distribution is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestMode {
    /// Every assignment of subjects to arms
    Exact,
    /// `reps` sampled assignments
    MonteCarlo,
}

impl From<bool> for TestMode {
    /// `true` selects exact mode
    fn from(exact: bool) -> Self {
        if exact {
            TestMode::Exact
        } else {
            TestMode::MonteCarlo
        }
    }
}

/// Validated parameters of a confidence-bound search
///
/// Every field is required; there is no `Default`. The
/// [`DEFAULT_MAX_COMBINATIONS`] and [`DEFAULT_REPS`] constants exist for
/// callers who want the conventional values, but must be passed explicitly.
#[derive(Debug, Clone)]
pub struct TauCiConfig {
    alpha: f64,
    mode: TestMode,
    max_combinations: u64,
    reps: u64,
    budget: SearchBudget,
}

impl TauCiConfig {
    /// Create a configuration
    ///
    /// # Arguments
    /// * `alpha` - Significance level in (0, 1); the interval has coverage `1 - alpha`
    /// * `mode` - Exact or Monte-Carlo null distributions
    /// * `max_combinations` - In exact mode, the largest acceptable `C(N, n)`;
    ///   in Monte-Carlo mode, the largest number of tables examined
    /// * `reps` - Monte-Carlo draws per table, at least 1
    pub fn new(alpha: f64, mode: TestMode, max_combinations: u64, reps: u64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::invalid_alpha(alpha));
        }
        if reps == 0 {
            return Err(Error::InvalidArgument("reps must be at least 1".to_string()));
        }
        Ok(Self {
            alpha,
            mode,
            max_combinations,
            reps,
            budget: SearchBudget::unlimited(),
        })
    }

    /// Bound the search by time, evaluations or a cancellation flag
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Significance level
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Coverage `1 - alpha`
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }

    /// Exact or Monte-Carlo null distributions
    pub fn mode(&self) -> TestMode {
        self.mode
    }

    /// Assignment cap (exact mode) or table cap (Monte-Carlo mode)
    pub fn max_combinations(&self) -> u64 {
        self.max_combinations
    }

    /// Monte-Carlo draws per table
    pub fn reps(&self) -> u64 {
        self.reps
    }

    /// Limits checked before each table evaluation
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = TauCiConfig::new(0.05, TestMode::Exact, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS)
            .unwrap();
        assert_eq!(config.alpha(), 0.05);
        assert_eq!(config.confidence_level(), 0.95);
        assert_eq!(config.mode(), TestMode::Exact);
        assert_eq!(config.max_combinations(), 100_000);
        assert_eq!(config.reps(), 1_000);
        assert!(!config.budget().is_limited());

        let limited = config.with_budget(SearchBudget::unlimited().with_max_evaluations(3));
        assert!(limited.budget().is_limited());
    }

    #[test]
    fn test_invalid_alpha() {
        for alpha in [0.0, 1.0, 1.2, -0.1, f64::NAN] {
            assert!(matches!(
                TauCiConfig::new(alpha, TestMode::Exact, 10, 10),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_zero_reps() {
        assert!(matches!(
            TauCiConfig::new(0.05, TestMode::MonteCarlo, 10, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mode_from_bool() {
        assert_eq!(TestMode::from(true), TestMode::Exact);
        assert_eq!(TestMode::from(false), TestMode::MonteCarlo);
    }
}
