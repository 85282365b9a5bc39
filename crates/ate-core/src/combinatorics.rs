//! Overflow-safe binomial coefficients
//!
//! Exact randomization distributions weight every permutation class by a
//! product of binomial coefficients. These grow factorially, so the exact
//! routines here are checked and return `None` instead of wrapping, and a
//! log-space counterpart is provided for tables too large for any integer
//! type.

use num_traits::PrimInt;

/// Exact binomial coefficient `C(n, k)` in any primitive integer type
///
/// Returns `None` when the result (or an intermediate product, after
/// reduction) does not fit in `T`. `C(n, k) = 0` for `k > n`.
pub fn checked_binomial<T: PrimInt>(n: u64, k: u64) -> Option<T> {
    if k > n {
        return Some(T::zero());
    }
    let k = k.min(n - k);
    let mut acc = T::one();
    for i in 0..k {
        // acc = C(n, i); step to C(n, i + 1) = acc * (n - i) / (i + 1)
        let num = <T as num_traits::NumCast>::from(n - i)?;
        let den = <T as num_traits::NumCast>::from(i + 1)?;
        let g = gcd(acc, den);
        let reduced_den = den / g;
        // reduced_den divides num because acc / g and reduced_den are coprime
        acc = (acc / g).checked_mul(&(num / reduced_den))?;
    }
    Some(acc)
}

/// Row of exact binomial coefficients `C(n, 0..=max_k)`
///
/// `None` when any entry overflows `u128`.
pub fn binomial_row(n: u64, max_k: u64) -> Option<Vec<u128>> {
    let max_k = max_k.min(n);
    let mut row = Vec::with_capacity(max_k as usize + 1);
    let mut acc: u128 = 1;
    row.push(acc);
    for i in 0..max_k {
        let num = u128::from(n - i);
        let den = u128::from(i + 1);
        let g = gcd(acc, den);
        acc = (acc / g).checked_mul(num / (den / g))?;
        row.push(acc);
    }
    Some(row)
}

/// Natural logarithm of `C(n, k)`; negative infinity for `k > n`
pub fn ln_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    statrs::function::factorial::ln_binomial(n, k)
}

/// Number of ways to assign `treated` of `total` subjects to treatment
///
/// Exact when it fits in `u128`, otherwise `None`; callers fall back to
/// [`ln_binomial`].
pub fn assignment_count(total: u64, treated: u64) -> Option<u128> {
    checked_binomial::<u128>(total, treated)
}

fn gcd<T: PrimInt>(mut a: T, mut b: T) -> T {
    while b != T::zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
