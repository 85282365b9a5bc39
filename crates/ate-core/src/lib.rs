//! Core types for randomization-based treatment-effect bounds
//!
//! This crate provides the foundation shared by the `ate-*` crates:
//!
//! - [`ObservedTable`]: the observed 2×2 table of a two-arm experiment with a
//!   binary outcome
//! - [`PotentialOutcomes`]: a latent 2×2 summary of potential outcomes
//! - [`UnitTable`]: the explicit per-subject expansion of a summary table
//! - overflow-safe [`combinatorics`] for exact randomization distributions
//! - [`SearchBudget`]: deadline / evaluation-count / cancellation limits
//! - the shared [`Error`] type
//!
//! # Example
//!
//! ```rust
//! use ate_core::{ObservedTable, PotentialOutcomes, UnitTable};
//!
//! let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
//! assert_eq!(observed.total(), 16);
//!
//! let table = PotentialOutcomes::new(14, 0, 1, 1).unwrap();
//! let units = UnitTable::from_summary(&table).unwrap();
//! assert_eq!(units.len(), 16);
//! assert_eq!(units.summarize(), table);
//! ```

pub mod budget;
pub mod combinatorics;
pub mod error;
pub mod observed;
pub mod potential;
pub mod unit_table;

// Re-export core types
pub use budget::SearchBudget;
pub use error::{Error, Result};
pub use observed::ObservedTable;
pub use potential::{LatentClass, PotentialOutcomes};
pub use unit_table::{expand_table, UnitTable};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        expand_table, Error, LatentClass, ObservedTable, PotentialOutcomes, Result, SearchBudget,
        UnitTable,
    };
}
