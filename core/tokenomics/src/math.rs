// citrate/core/tokenomics/src/math.rs

//! Fixed-point arithmetic kernel.
//!
//! Values are `U256` scaled by [`PRECISION`] (18 decimals). Every routine is
//! checked: overflow is reported as [`TokenomicsError::OverflowProtection`]
//! instead of wrapping, and every loop has a fixed iteration bound.

use crate::error::{Result, TokenomicsError};
use primitive_types::{U256, U512};

/// 1.0 in fixed-point (10^18)
pub const PRECISION: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Basis points denominator (100% = 10_000)
pub const BPS: U256 = U256([10_000, 0, 0, 0]);

/// Euler's number in fixed-point
pub const E: U256 = U256([2_718_281_828_459_045_235, 0, 0, 0]);

/// ln(2) in fixed-point
pub const LN_2: U256 = U256([693_147_180_559_945_309, 0, 0, 0]);

/// Largest argument accepted by [`exp`] (20.0)
pub const MAX_EXP_ARG: U256 = U256([1_553_255_926_290_448_384, 1, 0, 0]);

/// Taylor terms evaluated by [`exp`] (1 + x + ... + x^11/11!)
pub const EXP_TAYLOR_TERMS: u64 = 12;

/// Series terms evaluated by [`ln`]
const LN_SERIES_TERMS: u64 = 32;

/// `a * b / d` with a 512-bit intermediate, rounded down.
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256> {
    if d.is_zero() {
        return Err(TokenomicsError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(d);
    U256::try_from(quotient).map_err(|_| TokenomicsError::OverflowProtection("mul_div"))
}

/// `a * b / d` with a 512-bit intermediate, rounded up.
pub fn mul_div_up(a: U256, b: U256, d: U256) -> Result<U256> {
    if d.is_zero() {
        return Err(TokenomicsError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let divisor = U512::from(d);
    let mut quotient = product / divisor;
    if !(product % divisor).is_zero() {
        quotient += U512::one();
    }
    U256::try_from(quotient).map_err(|_| TokenomicsError::OverflowProtection("mul_div_up"))
}

/// Fixed-point multiply: `a * b / PRECISION`
pub fn mul_fixed(a: U256, b: U256) -> Result<U256> {
    mul_div(a, b, PRECISION)
}

/// Fixed-point divide: `a * PRECISION / b`
pub fn div_fixed(a: U256, b: U256) -> Result<U256> {
    mul_div(a, PRECISION, b)
}

pub fn checked_add(a: U256, b: U256, context: &'static str) -> Result<U256> {
    a.checked_add(b)
        .ok_or(TokenomicsError::OverflowProtection(context))
}

pub fn checked_sub(a: U256, b: U256, context: &'static str) -> Result<U256> {
    a.checked_sub(b)
        .ok_or(TokenomicsError::OverflowProtection(context))
}

/// Fixed-point exponentiation by squaring: `base^exp` where `base` is scaled
/// by `PRECISION` and `exp` is a plain integer. `pow(x, 0) == PRECISION`.
pub fn pow(base: U256, exp: u64) -> Result<U256> {
    if exp == 0 {
        return Ok(PRECISION);
    }
    if base.is_zero() {
        return Ok(U256::zero());
    }

    let mut result = PRECISION;
    let mut base = base;
    let mut exp = exp;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_fixed(result, base)?;
            if result.is_zero() {
                break;
            }
        }
        exp >>= 1;
        if exp > 0 {
            base = mul_fixed(base, base)?;
        }
    }

    Ok(result)
}

/// Fixed-point `e^x` for `0 <= x <= 20.0`.
///
/// The argument is split into its integer and fractional parts; `e^n` comes
/// from [`pow`] and `e^frac` from a Taylor series truncated at
/// [`EXP_TAYLOR_TERMS`] terms, stopping early once a term rounds to zero.
pub fn exp(x: U256) -> Result<U256> {
    if x > MAX_EXP_ARG {
        return Err(TokenomicsError::OverflowProtection("exp"));
    }

    let whole = (x / PRECISION).low_u64();
    let frac = x % PRECISION;

    let mut sum = PRECISION;
    let mut term = PRECISION;
    for n in 1..EXP_TAYLOR_TERMS {
        term = mul_fixed(term, frac)? / U256::from(n);
        if term.is_zero() {
            break;
        }
        sum += term;
    }

    mul_fixed(pow(E, whole)?, sum)
}

/// Fixed-point natural logarithm for `x >= 1.0`.
///
/// `x` is normalised to `m * 2^k` with `m` in `[1, 2)`, then
/// `ln(m) = 2 * atanh((m - 1) / (m + 1))` is summed as an odd power series.
pub fn ln(x: U256) -> Result<U256> {
    if x < PRECISION {
        return Err(TokenomicsError::MathDomain("ln"));
    }

    let two = PRECISION << 1;
    let mut k = 0u64;
    let mut m = x;
    while m >= two {
        m >>= 1;
        k += 1;
    }

    let z = mul_div(m - PRECISION, PRECISION, m + PRECISION)?;
    let z_squared = mul_fixed(z, z)?;

    let mut series = U256::zero();
    let mut term = z;
    for i in 0..LN_SERIES_TERMS {
        series += term / U256::from(2 * i + 1);
        term = mul_fixed(term, z_squared)?;
        if term.is_zero() {
            break;
        }
    }

    Ok(LN_2 * U256::from(k) + (series << 1))
}

/// Fixed-point `base^exponent` for `base >= 1.0` and a fractional
/// fixed-point exponent, via `e^(exponent * ln(base))`.
pub fn pow_frac(base: U256, exponent: U256) -> Result<U256> {
    if base < PRECISION {
        return Err(TokenomicsError::MathDomain("pow_frac"));
    }
    if exponent.is_zero() {
        return Ok(PRECISION);
    }
    let log = ln(base)?;
    exp(mul_fixed(log, exponent)?)
}

/// Absolute difference between two values
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}
