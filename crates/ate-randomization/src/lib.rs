//! Randomization tests for potential-outcomes tables
//!
//! A potential-outcomes table fixes both outcomes of every subject, so the
//! only randomness left is the treatment assignment. Re-randomizing it gives
//! the null distribution of the difference-in-means estimator, against which
//! the observed estimate is judged.
//!
//! - [`ExactTest`]: every assignment, grouped into permutation classes
//! - [`MonteCarloTest`]: sampled assignments from a caller-supplied generator
//!
//! Both implement [`RandomizationTest`] and use the Neyman-studentized
//! statistic `|tau_hat - tau| / sqrt(Var(tau_hat))`.
//!
//! # Example
//!
//! ```rust
//! use ate_core::{expand_table, ObservedTable};
//! use ate_randomization::{ExactTest, RandomizationTest};
//!
//! let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
//! let units = expand_table(&[14, 0, 1, 1]).unwrap();
//! let mut test = ExactTest::new();
//! let outcome = test.evaluate(&units, -1.0 / 16.0, &observed, 0.05).unwrap();
//! assert!(!outcome.reject);
//! assert_eq!(outcome.repetitions, 120);
//! ```

pub mod distribution;
mod exact;
mod monte_carlo;
pub mod statistic;
mod traits;

pub use distribution::{NullDistribution, Weight};
pub use exact::{exact_outcome, ExactTest};
pub use monte_carlo::MonteCarloTest;
pub use traits::{RandomizationTest, TestOutcome};
