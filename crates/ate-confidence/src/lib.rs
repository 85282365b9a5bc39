//! Confidence bounds for the average treatment effect on a binary outcome
//!
//! A two-arm experiment with a binary outcome is summarized by its observed
//! 2×2 table. This crate computes a two-sided confidence interval for the
//! average treatment effect `tau` by inverting randomization tests over every
//! potential-outcomes table consistent with that observation:
//!
//! - **Exact mode**: every assignment of subjects to arms is enumerated
//! - **Monte-Carlo mode**: assignments (and, past `max_combinations`, tables)
//!   are sampled
//!
//! Both bounds are multiples of `1/N` and come with the potential-outcomes
//! table that witnesses them.
//!
//! The crate also provides [`hypergeometric_interval`], a confidence interval
//! for the number of "good" items in a finite population from a simple random
//! sample.
//!
//! # Examples
//!
//! ```rust
//! use ate_confidence::{tau_twosided_ci, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS};
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let ci = tau_twosided_ci(1, 1, 2, 0, 0.05, true, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS, &mut rng)
//!     .unwrap();
//! assert_eq!(ci.scaled_bounds(), [-3, 1]);
//! println!("{ci}");
//! ```

mod config;
mod hypergeometric;
mod search;
mod types;

// Re-exports
pub use config::{TauCiConfig, TestMode, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS};
pub use hypergeometric::{hypergeometric_interval, Tail};
pub use search::{tau_twosided_ci, TauCiSearch};
pub use types::TauInterval;
