//! Confidence bounds for the number of "good" items in a finite population
//!
//! A simple random sample of `n` items from a population of `N` contains `x`
//! good ones. The bounds on the population count `G` come from inverting
//! hypergeometric tail probabilities, which are monotone in `G`, so each side
//! is found by bisection over the feasible range `[x, N - (n - x)]`. Tail
//! sums are accumulated from log-space binomial coefficients so large
//! populations do not overflow.

use ate_core::combinatorics::ln_binomial;
use ate_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which side(s) of the interval to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tail {
    /// Lower bound only; the upper bound is the population size
    Lower,
    /// Upper bound only; the lower bound is 0
    Upper,
    /// Both bounds, each at level `1 - (1 - cl) / 2`
    TwoSided,
}

/// Confidence interval `[lower, upper]` for the number of good items
///
/// # Arguments
/// * `observed_count` - Good items in the sample (`x`)
/// * `sample_size` - Sample size (`n`)
/// * `population_size` - Population size (`N`)
/// * `confidence_level` - Coverage in (0, 1)
/// * `tail` - Which bounds to compute
///
/// # Examples
///
/// ```rust
/// use ate_confidence::{hypergeometric_interval, Tail};
///
/// let [lower, upper] = hypergeometric_interval(5, 10, 100, 0.95, Tail::TwoSided).unwrap();
/// assert!(lower <= 50 && 50 <= upper);
/// ```
pub fn hypergeometric_interval(
    observed_count: u64,
    sample_size: u64,
    population_size: u64,
    confidence_level: f64,
    tail: Tail,
) -> Result<[u64; 2]> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(Error::InvalidArgument(format!(
            "confidence level {confidence_level} must be in (0, 1)"
        )));
    }
    if observed_count > sample_size {
        return Err(Error::InvalidArgument(format!(
            "observed count {observed_count} exceeds sample size {sample_size}"
        )));
    }
    if sample_size > population_size {
        return Err(Error::InvalidArgument(format!(
            "sample size {sample_size} exceeds population size {population_size}"
        )));
    }
    if population_size == 0 {
        return Err(Error::InvalidArgument(
            "population must contain at least one item".to_string(),
        ));
    }

    let level = match tail {
        Tail::TwoSided => 1.0 - (1.0 - confidence_level) / 2.0,
        Tail::Lower | Tail::Upper => confidence_level,
    };
    let x = observed_count;
    let feasible = (x, population_size - (sample_size - x));
    let cdf = |k: u64, good: u64| hypergeometric_cdf(k, population_size, good, sample_size);

    let lower = if tail != Tail::Upper && x > 0 {
        // Smallest G with P(X <= x - 1; G) <= level
        let (mut lo, mut hi) = feasible;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if cdf(x - 1, mid) <= level {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    } else {
        0
    };

    let upper = if tail != Tail::Lower && x < sample_size {
        // Largest G with P(X <= x; G) >= 1 - level
        let (mut lo, mut hi) = feasible;
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if cdf(x, mid) >= 1.0 - level {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    } else {
        population_size
    };

    Ok([lower, upper])
}

/// `P(X <= k)` for `X` the good items in `draws` taken from `population`
/// items of which `good` are good
fn hypergeometric_cdf(k: u64, population: u64, good: u64, draws: u64) -> f64 {
    let min = draws.saturating_sub(population - good);
    let max = draws.min(good);
    if k < min {
        return 0.0;
    }
    if k >= max {
        return 1.0;
    }
    let ln_total = ln_binomial(population, draws);
    let cdf: f64 = (min..=k)
        .map(|i| {
            (ln_binomial(good, i) + ln_binomial(population - good, draws - i) - ln_total).exp()
        })
        .sum();
    cdf.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cdf() {
        // 20 items, 5 good, draw 4: P(X = 0) = C(15, 4) / C(20, 4) = 1365 / 4845
        assert_relative_eq!(hypergeometric_cdf(0, 20, 5, 4), 1365.0 / 4845.0, epsilon = 1e-12);
        // Support starts at 2 when 18 of 20 are good
        assert_eq!(hypergeometric_cdf(1, 20, 18, 4), 0.0);
        assert_eq!(hypergeometric_cdf(4, 20, 18, 4), 1.0);
        assert_relative_eq!(
            hypergeometric_cdf(2, 20, 18, 4),
            153.0 / 4845.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_two_sided_reference_values() {
        assert_eq!(
            hypergeometric_interval(2, 10, 100, 0.95, Tail::TwoSided).unwrap(),
            [3, 54]
        );
        assert_eq!(
            hypergeometric_interval(5, 10, 100, 0.95, Tail::TwoSided).unwrap(),
            [20, 80]
        );
    }

    #[test]
    fn test_one_sided() {
        assert_eq!(
            hypergeometric_interval(2, 10, 100, 0.95, Tail::Lower).unwrap(),
            [5, 100]
        );
        assert_eq!(
            hypergeometric_interval(2, 10, 100, 0.95, Tail::Upper).unwrap(),
            [0, 49]
        );
    }

    #[test]
    fn test_extreme_counts() {
        assert_eq!(
            hypergeometric_interval(0, 10, 100, 0.95, Tail::TwoSided).unwrap(),
            [0, 29]
        );
        assert_eq!(
            hypergeometric_interval(10, 10, 100, 0.95, Tail::TwoSided).unwrap(),
            [71, 100]
        );
    }

    #[test]
    fn test_narrows_with_sample_size() {
        let small = hypergeometric_interval(1, 4, 40, 0.95, Tail::TwoSided).unwrap();
        let large = hypergeometric_interval(10, 40, 400, 0.95, Tail::TwoSided).unwrap();
        assert_eq!(large, [53, 161]);
        let relative = |[lo, hi]: [u64; 2], n: u64| (hi - lo) as f64 / n as f64;
        assert!(relative(large, 400) < relative(small, 40));
        assert!(large[0] <= 100 && 100 <= large[1]);
    }

    #[test]
    fn test_invalid_arguments() {
        for result in [
            hypergeometric_interval(11, 10, 100, 0.95, Tail::TwoSided),
            hypergeometric_interval(2, 101, 100, 0.95, Tail::TwoSided),
            hypergeometric_interval(2, 10, 100, 1.0, Tail::TwoSided),
            hypergeometric_interval(2, 10, 100, 0.0, Tail::Lower),
            hypergeometric_interval(0, 0, 0, 0.95, Tail::Upper),
        ] {
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }
}
