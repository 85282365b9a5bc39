//! Algebraic consistency between latent and observed tables
//!
//! A potential-outcomes table is consistent with an observed table when some
//! assignment of `n` subjects to treatment would have produced exactly the
//! observed counts. Li & Ding (2016, Theorem 1) reduce that existence question
//! to a single max/min inequality; [`witness_split`] answers it constructively.

use ate_core::{LatentClass, ObservedTable, PotentialOutcomes};

/// Li & Ding Theorem 1 consistency check
///
/// Returns `false` when the tables disagree on the number of subjects.
pub fn is_consistent(table: &PotentialOutcomes, observed: &ObservedTable) -> bool {
    if table.total() != observed.total() {
        return false;
    }
    let [_, n01, n10, n11] = table.as_array().map(i128::from);
    let total = i128::from(table.total());
    let obs_n11 = i128::from(observed.n11());
    let obs_n10 = i128::from(observed.n10());
    let obs_n01 = i128::from(observed.n01());

    let lower = 0i128
        .max(obs_n11 - n01)
        .max(n11 - obs_n01)
        .max(n10 + n11 - obs_n10 - obs_n01);
    let upper = n11
        .min(obs_n11)
        .min(n10 + n11 - obs_n01)
        .min(total - n01 - obs_n01 - obs_n10);
    lower <= upper
}

/// Per-class treated counts reproducing an observed table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmSplit {
    table: PotentialOutcomes,
    treated: [u64; 4],
}

impl ArmSplit {
    /// The latent table being split
    pub fn table(&self) -> &PotentialOutcomes {
        &self.table
    }

    /// Subjects of `class` assigned to treatment
    pub fn treated(&self, class: LatentClass) -> u64 {
        self.treated[class.index()]
    }

    /// Subjects of `class` assigned to control
    pub fn control(&self, class: LatentClass) -> u64 {
        self.table.count(class) - self.treated(class)
    }

    /// Observed table produced by this assignment
    ///
    /// A treated subject reveals its treatment outcome and a control subject
    /// its control outcome.
    pub fn observed(&self) -> ObservedTable {
        let mut counts = [0u64; 4];
        for class in LatentClass::ALL {
            let [control_outcome, treatment_outcome] = class.outcomes();
            // n11, n10, n01, n00
            let treated_slot = if treatment_outcome == 1 { 0 } else { 1 };
            let control_slot = if control_outcome == 1 { 2 } else { 3 };
            counts[treated_slot] += self.treated(class);
            counts[control_slot] += self.control(class);
        }
        ObservedTable::from_counts(counts[0], counts[1], counts[2], counts[3])
    }
}

/// Find an assignment of subjects to arms reproducing `observed`
///
/// The treated count of always-responders `x11` determines the rest:
/// `x01 = n11 - x11`, `x10 = N10 + N11 - n01 - x11` and `x00 = n10 - x10`.
/// The split with the smallest feasible `x11` is returned; `None` when the
/// table is inconsistent with the observation.
pub fn witness_split(table: &PotentialOutcomes, observed: &ObservedTable) -> Option<ArmSplit> {
    if table.total() != observed.total() {
        return None;
    }
    let [n00, n01, n10, n11] = table.as_array().map(i128::from);
    let obs_n11 = i128::from(observed.n11());
    let obs_n10 = i128::from(observed.n10());
    let obs_n01 = i128::from(observed.n01());

    (0..=n11.min(obs_n11)).find_map(|x11| {
        let x01 = obs_n11 - x11;
        let x10 = n10 + n11 - obs_n01 - x11;
        let x00 = obs_n10 - x10;
        let fits = |x: i128, cap: i128| (0..=cap).contains(&x);
        if fits(x00, n00) && fits(x01, n01) && fits(x10, n10) {
            let treated = [x00, x01, x10, x11].map(|x| x as u64);
            Some(ArmSplit {
                table: *table,
                treated,
            })
        } else {
            None
        }
    })
}
