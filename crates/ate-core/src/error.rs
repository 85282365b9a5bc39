//! Error types for treatment-effect bound computation
//!
//! Provides a unified error type for all ate-* crates.

use thiserror::Error;

/// Core error type for confidence-bound operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid argument provided to a function (negative or non-integral
    /// counts, mismatched totals, alpha outside (0, 1), ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller-supplied resource bound would be exceeded
    #[error("Resource exceeded: {0}")]
    ResourceExceeded(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a negative subject count
    pub fn negative_count(name: &str, value: i64) -> Self {
        Self::InvalidArgument(format!("subject count {name} cannot be negative (got {value})"))
    }

    /// Create an error for a count that is not a whole number
    pub fn non_integral(name: &str, value: f64) -> Self {
        Self::InvalidArgument(format!("subject count {name} must be a whole number (got {value})"))
    }

    /// Create an error for an invalid significance level
    pub fn invalid_alpha(alpha: f64) -> Self {
        Self::InvalidArgument(format!("alpha {alpha} must be in (0, 1)"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: u64, actual: u64, context: &str) -> Self {
        Self::InvalidArgument(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a combinatorial bound that is too small
    pub fn capacity(required: impl std::fmt::Display, limit: u64, context: &str) -> Self {
        Self::ResourceExceeded(format!(
            "{context} needs {required} combinations but the limit is {limit}"
        ))
    }
}
