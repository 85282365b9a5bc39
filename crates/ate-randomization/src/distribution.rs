//! Weighted null distributions of the test statistic
//!
//! Exact distributions carry integer permutation counts (`u128`) or, for
//! tables too large for integers, normalized probabilities (`f64`).
//! Monte-Carlo distributions carry draw counts (`u64`). All three share one
//! representation: a map from statistic value to accumulated weight.

use ate_core::{Error, Result};
use num_traits::{ToPrimitive, Zero};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::AddAssign;

/// Weight attached to one atom of a null distribution
pub trait Weight: Copy + Zero + AddAssign + ToPrimitive + Debug {}

impl<T> Weight for T where T: Copy + Zero + AddAssign + ToPrimitive + Debug {}

/// Discrete distribution of a non-negative statistic
#[derive(Debug, Clone)]
pub struct NullDistribution<W: Weight> {
    atoms: BTreeMap<OrderedFloat<f64>, W>,
    total: W,
}

impl<W: Weight> Default for NullDistribution<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> NullDistribution<W> {
    /// Create an empty distribution
    pub fn new() -> Self {
        Self {
            atoms: BTreeMap::new(),
            total: W::zero(),
        }
    }

    /// Add `weight` at `value`
    pub fn add(&mut self, value: f64, weight: W) {
        *self.atoms.entry(OrderedFloat(value)).or_insert_with(W::zero) += weight;
        self.total += weight;
    }

    /// Total weight
    pub fn total(&self) -> W {
        self.total
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether nothing was added
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Upper-tail probability `P(T >= value)`
    ///
    /// The tail weight is summed in `W` before the single division, so
    /// integer weights give correctly rounded ratios.
    pub fn tail_probability(&self, value: f64) -> Result<f64> {
        let total = self.total_f64()?;
        let mut tail = W::zero();
        for weight in self.atoms.range(OrderedFloat(value)..).map(|(_, w)| *w) {
            tail += weight;
        }
        let tail = to_f64(tail)?;
        Ok((tail / total).min(1.0))
    }

    /// Smallest value `v` with `P(T <= v) >= level`
    pub fn quantile(&self, level: f64) -> Result<f64> {
        let total = self.total_f64()?;
        let mut cumulative = W::zero();
        let mut last = None;
        for (value, weight) in &self.atoms {
            cumulative += *weight;
            last = Some(value.0);
            if to_f64(cumulative)? / total >= level {
                return Ok(value.0);
            }
        }
        // Accumulated rounding can leave the last atom a hair below `level`
        last.ok_or_else(|| Error::Computation("empty null distribution".to_string()))
    }

    fn total_f64(&self) -> Result<f64> {
        let total = to_f64(self.total)?;
        if self.is_empty() || total.is_nan() || total <= 0.0 {
            return Err(Error::Computation(
                "null distribution has no weight".to_string(),
            ));
        }
        Ok(total)
    }
}

fn to_f64<W: Weight>(weight: W) -> Result<f64> {
    weight
        .to_f64()
        .ok_or_else(|| Error::Computation(format!("weight {weight:?} is not representable")))
}
