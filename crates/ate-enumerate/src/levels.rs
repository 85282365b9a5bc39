//! Grouping of tables by average treatment effect
//!
//! Every table of N subjects has an effect `tau = k / N` with integer
//! numerator `k = N01 - N10` in `[-N, N]`. The confidence search walks these
//! levels outward from the point estimate, so tables are grouped by `k` with
//! canonical order kept inside each level.

use crate::TableEnumerator;
use ate_core::{Error, PotentialOutcomes, Result};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Candidate tables keyed by effect numerator
#[derive(Debug, Clone, Default)]
pub struct EffectLevels {
    total: u64,
    levels: BTreeMap<i64, Vec<PotentialOutcomes>>,
    table_count: usize,
}

impl EffectLevels {
    /// Group every table produced by `tables`
    pub fn collect(tables: TableEnumerator) -> Self {
        let total = tables.total();
        let mut levels = Self::empty(total);
        for table in tables {
            levels.push(table);
        }
        debug!(
            "Collected {} tables over {} effect levels",
            levels.table_count,
            levels.levels.len()
        );
        levels
    }

    /// Group at most `max_tables` tables
    ///
    /// When more tables are feasible, a uniformly random subset of exactly
    /// `max_tables` is drawn without replacement; selected tables keep their
    /// canonical order. Fails with `ResourceExceeded` when `max_tables` is 0.
    pub fn sample<R: Rng + ?Sized>(
        tables: TableEnumerator,
        max_tables: u64,
        rng: &mut R,
    ) -> Result<Self> {
        if max_tables == 0 {
            return Err(Error::ResourceExceeded(
                "max_combinations is 0, so no table can be examined".to_string(),
            ));
        }
        let feasible = tables.clone().count();
        let limit = usize::try_from(max_tables).unwrap_or(usize::MAX);
        if feasible <= limit {
            return Ok(Self::collect(tables));
        }

        let mut chosen = rand::seq::index::sample(rng, feasible, limit).into_vec();
        chosen.sort_unstable();

        let total = tables.total();
        let mut levels = Self::empty(total);
        let mut picks = chosen.into_iter().peekable();
        for (position, table) in tables.enumerate() {
            match picks.peek() {
                Some(&next) if next == position => {
                    levels.push(table);
                    picks.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        debug!(
            "Sampled {} of {} feasible tables over {} effect levels",
            levels.table_count,
            feasible,
            levels.levels.len()
        );
        Ok(levels)
    }

    fn empty(total: u64) -> Self {
        Self {
            total,
            levels: BTreeMap::new(),
            table_count: 0,
        }
    }

    fn push(&mut self, table: PotentialOutcomes) {
        self.levels
            .entry(table.effect_numerator())
            .or_default()
            .push(table);
        self.table_count += 1;
    }

    /// Number of subjects N
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of grouped tables
    pub fn table_count(&self) -> usize {
        self.table_count
    }

    /// Number of non-empty levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no table was grouped
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Tables of level `k`, in canonical order
    pub fn level(&self, k: i64) -> Option<&[PotentialOutcomes]> {
        self.levels.get(&k).map(Vec::as_slice)
    }

    /// Smallest non-empty level
    pub fn min_level(&self) -> Option<i64> {
        self.levels.keys().next().copied()
    }

    /// Largest non-empty level
    pub fn max_level(&self) -> Option<i64> {
        self.levels.keys().next_back().copied()
    }

    /// Non-empty level closest to `target`, ties resolved downward
    pub fn nearest_level(&self, target: f64) -> Option<i64> {
        let mut best: Option<(i64, f64)> = None;
        for &k in self.levels.keys() {
            let distance = (k as f64 - target).abs();
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((k, distance)),
            }
        }
        best.map(|(k, _)| k)
    }

    /// Non-empty levels strictly below `k`, nearest first
    pub fn levels_below(&self, k: i64) -> impl Iterator<Item = i64> + '_ {
        self.levels.range(..k).rev().map(|(&level, _)| level)
    }

    /// Non-empty levels strictly above `k`, nearest first
    pub fn levels_above(&self, k: i64) -> impl Iterator<Item = i64> + '_ {
        self.levels
            .range(k.saturating_add(1)..)
            .map(|(&level, _)| level)
    }

    /// All levels in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[PotentialOutcomes])> + '_ {
        self.levels.iter().map(|(&k, tables)| (k, tables.as_slice()))
    }
}
