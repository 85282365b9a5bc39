//! Randomization-based confidence bounds for the average treatment effect
//!
//! A two-arm experiment on `N` subjects with a binary outcome leaves every
//! subject's other potential outcome unobserved. This crate bounds the
//! average treatment effect `tau` without modelling assumptions: each
//! potential-outcomes table consistent with the observed 2×2 table is tested
//! by re-randomizing the assignment, and the confidence set collects the
//! effects of the tables that survive.
//!
//! The workspace is split into:
//!
//! - [`ate_core`]: tables, unit expansion, combinatorics, budgets and errors
//! - [`ate_enumerate`]: consistent potential-outcomes tables grouped by effect
//! - [`ate_randomization`]: exact and Monte-Carlo randomization tests
//! - [`ate_confidence`]: the interval search and a hypergeometric interval
//!
//! # Example
//!
//! ```rust
//! use ate_bounds::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let ci = tau_twosided_ci(1, 1, 1, 13, 0.05, true, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS, &mut rng)?;
//! assert_eq!(ci.scaled_bounds(), [-1, 14]);
//! # Ok::<(), ate_bounds::Error>(())
//! ```

pub use ate_confidence;
pub use ate_core;
pub use ate_enumerate;
pub use ate_randomization;

pub use ate_confidence::{
    hypergeometric_interval, tau_twosided_ci, TauCiConfig, TauCiSearch, TauInterval, Tail,
    TestMode, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS,
};
pub use ate_core::{
    expand_table, Error, ObservedTable, PotentialOutcomes, Result, SearchBudget, UnitTable,
};
pub use ate_enumerate::{enumerate_tables, is_consistent, EffectLevels, TableEnumerator};
pub use ate_randomization::{ExactTest, MonteCarloTest, RandomizationTest, TestOutcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use ate_confidence::{
        hypergeometric_interval, tau_twosided_ci, TauCiConfig, TauCiSearch, TauInterval, Tail,
        TestMode, DEFAULT_MAX_COMBINATIONS, DEFAULT_REPS,
    };
    pub use ate_core::prelude::*;
    pub use ate_enumerate::{enumerate_tables, is_consistent};
}
