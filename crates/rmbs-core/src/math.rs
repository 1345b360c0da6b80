//! Decimal math helpers (no f64, no powd).
//!
//! Integer powers are computed by repeated multiplication and the fractional
//! twelfth root needed for CPR → SMM by Newton iteration, so every schedule
//! value stays in 128-bit decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RmbsError;
use crate::types::{Money, Rate};
use crate::RmbsResult;

const ROOT_TOLERANCE: Decimal = dec!(0.0000000000001);
const MAX_ROOT_ITERATIONS: u32 = 40;

/// Compute base^n for a non-negative integer exponent via iterative multiplication.
///
/// Returns `None` if the power overflows the decimal range.
pub fn checked_pow(base: Decimal, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

/// Compute the nth root of x using Newton's method.
/// x^(1/n) where n is a positive integer.
///
/// Newton iteration: g_{k+1} = g_k - (g_k^n - x) / (n * g_k^{n-1})
pub fn nth_root(x: Decimal, n: u32) -> Decimal {
    if x == Decimal::ONE {
        return Decimal::ONE;
    }
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if n == 0 {
        return Decimal::ONE;
    }
    if n == 1 {
        return x;
    }

    let n_dec = Decimal::from(n);

    // Inputs are of the form (1 - small_rate), so 1 is a good starting point.
    let mut guess = Decimal::ONE;

    for _ in 0..MAX_ROOT_ITERATIONS {
        let g_n_minus_1 = match checked_pow(guess, n - 1) {
            Some(v) if !v.is_zero() => v,
            _ => break,
        };
        let g_n = g_n_minus_1 * guess;

        let delta = (g_n - x) / (n_dec * g_n_minus_1);
        guess -= delta;

        if delta.abs() < ROOT_TOLERANCE {
            break;
        }
    }

    guess
}

/// Level monthly payment that retires `principal` over `n` periods at
/// `periodic_rate`:
///
/// payment = P * r * (1+r)^n / ((1+r)^n - 1) = P * r / (1 - (1+r)^-n)
///
/// The second form keeps every intermediate no larger than the payment.
/// A zero rate leaves the annuity formula undefined and is reported as
/// [`RmbsError::DegenerateRate`], as is a rate so small that `(1+r)^n`
/// rounds to exactly one.
pub fn level_payment(principal: Money, periodic_rate: Rate, n: u32) -> RmbsResult<Money> {
    if n == 0 {
        return Err(RmbsError::InvalidParameter {
            field: "term_months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if periodic_rate.is_zero() {
        return Err(RmbsError::DegenerateRate(
            "monthly rate is zero; level payment is undefined".into(),
        ));
    }

    let one_plus_r = Decimal::ONE + periodic_rate;
    // (1+r)^-n -> 0 as the factor grows past the decimal range.
    let discount = match checked_pow(one_plus_r, n) {
        Some(factor) => Decimal::ONE.checked_div(factor).unwrap_or(Decimal::ZERO),
        None => Decimal::ZERO,
    };
    let denom = Decimal::ONE - discount;
    if denom <= Decimal::ZERO {
        return Err(RmbsError::DegenerateRate(format!(
            "(1 + {periodic_rate})^{n} does not exceed 1; level payment is undefined"
        )));
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|interest| interest.checked_div(denom))
        .ok_or_else(|| RmbsError::InvalidParameter {
            field: "principal".into(),
            reason: format!("Level payment on {principal} at {periodic_rate} exceeds the decimal range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_checked_pow_small_exponents() {
        assert_eq!(checked_pow(dec!(1.5), 0), Some(Decimal::ONE));
        assert_eq!(checked_pow(dec!(2), 10), Some(dec!(1024)));
        assert_eq!(checked_pow(dec!(1.1), 2), Some(dec!(1.21)));
    }

    #[test]
    fn test_checked_pow_overflow() {
        assert_eq!(checked_pow(dec!(10), 40), None);
    }

    #[test]
    fn test_nth_root_precision() {
        // 0.998^(1/12) -> raising back to the 12th power recovers the input.
        let root = nth_root(dec!(0.998), 12);
        let back = checked_pow(root, 12).unwrap();
        assert_close(back, dec!(0.998), dec!(0.000000001), "12th root round trip");
    }

    #[test]
    fn test_nth_root_edges() {
        assert_eq!(nth_root(Decimal::ONE, 12), Decimal::ONE);
        assert_eq!(nth_root(Decimal::ZERO, 12), Decimal::ZERO);
        assert_eq!(nth_root(dec!(0.5), 1), dec!(0.5));
    }

    #[test]
    fn test_level_payment_standard_mortgage() {
        // $100mm, 4%/12, 360 months -> ~$477,415.29 per month.
        let pmt = level_payment(dec!(100_000_000), dec!(0.04) / dec!(12), 360).unwrap();
        assert_close(pmt, dec!(477_415.29), dec!(0.5), "Level payment");
    }

    #[test]
    fn test_level_payment_single_period() {
        // One period: repay principal plus one month of interest.
        let pmt = level_payment(dec!(1000), dec!(0.01), 1).unwrap();
        assert_close(pmt, dec!(1010), dec!(0.0000001), "Single-period payment");
    }

    #[test]
    fn test_level_payment_zero_rate_is_degenerate() {
        let err = level_payment(dec!(1000), Decimal::ZERO, 12).unwrap_err();
        assert!(matches!(err, RmbsError::DegenerateRate(_)));
    }

    #[test]
    fn test_level_payment_zero_periods_rejected() {
        let err = level_payment(dec!(1000), dec!(0.01), 0).unwrap_err();
        assert!(matches!(err, RmbsError::InvalidParameter { .. }));
    }

    #[test]
    fn test_level_payment_overflowing_factor_tends_to_interest_only() {
        let pmt = level_payment(dec!(1000), dec!(0.5), 1000).unwrap();
        assert_eq!(pmt, dec!(500));
    }

    #[test]
    fn test_level_payment_large_factor_within_range() {
        // 2^90 ≈ 1.24e27 still fits, but P * r * 2^90 would not.
        let pmt = level_payment(dec!(1000), dec!(1), 90).unwrap();
        assert_close(pmt, dec!(1000), dec!(0.000001), "Payment near P * r");
    }

    #[test]
    fn test_level_payment_out_of_range_is_an_error() {
        let err = level_payment(Decimal::MAX, dec!(2), 12).unwrap_err();
        assert!(matches!(err, RmbsError::InvalidParameter { .. }));
    }
}
