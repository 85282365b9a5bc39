//! Potential-outcomes tables consistent with an observed experiment
//!
//! Given the observed 2×2 table of a two-arm experiment with a binary
//! outcome, this crate produces every latent summary table
//! `(N00, N01, N10, N11)` that some assignment of subjects could have turned
//! into the observation:
//!
//! - [`is_consistent`] / [`witness_split`]: the consistency test of
//!   Li & Ding (2016, Theorem 1), and a constructive counterpart
//! - [`TableEnumerator`]: a lazy iterator over consistent tables in
//!   canonical order
//! - [`EffectLevels`]: tables grouped by average treatment effect, with
//!   bounded random sampling for large problems
//!
//! # Example
//!
//! ```rust
//! use ate_enumerate::{enumerate_tables, EffectLevels};
//!
//! let tables = enumerate_tables(16, 1, 1, 1, 13).unwrap();
//! let levels = EffectLevels::collect(tables);
//! assert_eq!(levels.table_count(), 99);
//! assert_eq!(levels.max_level(), Some(14));
//! ```

mod consistency;
mod enumerator;
mod levels;

pub use consistency::{is_consistent, witness_split, ArmSplit};
pub use enumerator::{enumerate_tables, TableEnumerator};
pub use levels::EffectLevels;
