//! Neyman-studentized difference-in-means statistic
//!
//! For a fixed potential-outcomes table, the difference-in-means estimator
//! `tau_hat = a/n - c/m` (treated ones over treated, control ones over
//! control) has randomization variance
//!
//! ```text
//! Var = S1²/n + S0²/m - Sτ²/N
//! ```
//!
//! where `S1²`, `S0²` and `Sτ²` are the finite-population variances (divisor
//! `N - 1`) of the treatment outcomes, control outcomes and individual
//! effects. The statistic is `|tau_hat - tau| / sqrt(Var)`.

use ate_core::PotentialOutcomes;

/// Difference in means `treated_ones/treated - control_ones/control`
///
/// Observed and resampled estimates must go through this same expression so
/// that an assignment reproducing the observation yields a bit-identical
/// value.
#[inline]
pub fn difference_in_means(
    treated_ones: u64,
    treated: u64,
    control_ones: u64,
    control: u64,
) -> f64 {
    treated_ones as f64 / treated as f64 - control_ones as f64 / control as f64
}

/// Absolute distance between an estimate and the hypothesized effect
#[inline]
pub fn discrepancy(tau_hat: f64, tau: f64) -> f64 {
    (tau_hat - tau).abs()
}

/// Randomization variance of the difference in means for `table` with
/// `treated` subjects in the treatment arm
///
/// The numerator is evaluated exactly in `i128` so a zero variance is
/// detected without rounding; huge tables fall back to `f64`. Returns 0 when
/// either arm is empty or N < 2.
pub fn randomization_variance(table: &PotentialOutcomes, treated: u64) -> f64 {
    let total = table.total();
    if treated == 0 || treated >= total || total < 2 {
        return 0.0;
    }
    let control = total - treated;
    let a1 = table.treatment_ones();
    let a0 = table.control_ones();
    let switchers = table.n01() + table.n10();
    let d = table.effect_numerator();

    match exact_numerator(total, treated, control, a1, a0, switchers, d) {
        Some(0) => 0.0,
        Some(numerator) => {
            let denominator =
                treated as f64 * control as f64 * (total as f64).powi(2) * (total - 1) as f64;
            numerator as f64 / denominator
        }
        None => float_variance(total, treated, control, a1, a0, switchers, d),
    }
}

/// Studentize a discrepancy; 0 when the variance vanishes
#[inline]
pub fn studentize(discrepancy: f64, variance: f64) -> f64 {
    if variance > 0.0 {
        discrepancy / variance.sqrt()
    } else {
        0.0
    }
}

// N·m·A1(N-A1) + N·n·A0(N-A0) - n·m·(N(N01+N10) - D²)
fn exact_numerator(
    total: u64,
    treated: u64,
    control: u64,
    a1: u64,
    a0: u64,
    switchers: u64,
    d: i64,
) -> Option<i128> {
    let big_n = i128::from(total);
    let n = i128::from(treated);
    let m = i128::from(control);
    let a1 = i128::from(a1);
    let a0 = i128::from(a0);
    let d = i128::from(d);

    let s1 = a1.checked_mul(big_n - a1)?.checked_mul(m)?.checked_mul(big_n)?;
    let s0 = a0.checked_mul(big_n - a0)?.checked_mul(n)?.checked_mul(big_n)?;
    let effects = big_n
        .checked_mul(i128::from(switchers))?
        .checked_sub(d.checked_mul(d)?)?;
    let s_tau = effects.checked_mul(n)?.checked_mul(m)?;
    s1.checked_add(s0)?.checked_sub(s_tau)
}

fn float_variance(
    total: u64,
    treated: u64,
    control: u64,
    a1: u64,
    a0: u64,
    switchers: u64,
    d: i64,
) -> f64 {
    let big_n = total as f64;
    let n = treated as f64;
    let m = control as f64;
    let scale = big_n * (big_n - 1.0);
    let s1 = a1 as f64 * (big_n - a1 as f64) / scale;
    let s0 = a0 as f64 * (big_n - a0 as f64) / scale;
    let s_tau = (big_n * switchers as f64 - (d as f64).powi(2)) / scale;
    (s1 / n + s0 / m - s_tau / big_n).max(0.0)
}
