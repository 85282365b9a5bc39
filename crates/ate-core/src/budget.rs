//! Resource budget for long-running searches
//!
//! Exact inversion can be factorially expensive. A [`SearchBudget`] lets the
//! caller bound a search by wall-clock time, by the number of table
//! evaluations, or abort it from another thread through a shared flag. Each
//! limit is opt-in; [`SearchBudget::unlimited`] imposes none.

use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative limits checked between table evaluations
#[derive(Debug, Clone)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    max_evaluations: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SearchBudget {
    /// A budget without any limit
    pub fn unlimited() -> Self {
        Self {
            deadline: None,
            max_evaluations: None,
            cancel: None,
        }
    }

    /// Abort once `timeout` has elapsed from now
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Abort once more than `max_evaluations` tables would be evaluated
    pub fn with_max_evaluations(mut self, max_evaluations: u64) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }

    /// Abort as soon as `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether any limit is configured
    pub fn is_limited(&self) -> bool {
        self.deadline.is_some() || self.max_evaluations.is_some() || self.cancel.is_some()
    }

    /// Check whether `evaluations` evaluations may proceed
    ///
    /// Fails with `ResourceExceeded` when the search was cancelled, the
    /// deadline passed, or the evaluation cap would be exceeded.
    pub fn check(&self, evaluations: u64) -> Result<()> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(Error::ResourceExceeded(format!(
                    "search cancelled after {evaluations} evaluations"
                )));
            }
        }
        if let Some(max) = self.max_evaluations {
            if evaluations > max {
                return Err(Error::ResourceExceeded(format!(
                    "search needs more than {max} table evaluations"
                )));
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::ResourceExceeded(format!(
                    "search deadline passed after {evaluations} evaluations"
                )));
            }
        }
        Ok(())
    }
}
