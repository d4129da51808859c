// citrate/core/tokenomics/src/integration.rs

//! Cost integration and cost-to-amount inversion.
//!
//! Linear and polynomial curves integrate exactly. Every other shape uses a
//! fixed-step composite Simpson's rule whose step count lives in
//! [`QuadratureConfig`]. Inversion is a bounded binary search that relies on
//! the price being non-decreasing in supply.

use crate::curve::CurveShape;
use crate::error::{Result, TokenomicsError};
use crate::math::{self, PRECISION};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Numerical integration and search settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    /// Simpson subintervals (even, at least 2)
    #[serde(default = "default_simpson_steps")]
    pub simpson_steps: u32,

    /// Upper bound on binary search and galloping iterations
    #[serde(default = "default_search_iterations")]
    pub search_iterations: u32,
}

fn default_simpson_steps() -> u32 {
    100
}

fn default_search_iterations() -> u32 {
    256
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            simpson_steps: default_simpson_steps(),
            search_iterations: default_search_iterations(),
        }
    }
}

impl QuadratureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.simpson_steps < 2 || self.simpson_steps % 2 != 0 {
            return Err(TokenomicsError::InvalidQuadrature(
                "simpson_steps must be even and at least 2",
            ));
        }
        if self.search_iterations == 0 {
            return Err(TokenomicsError::InvalidQuadrature(
                "search_iterations must be positive",
            ));
        }
        Ok(())
    }
}

/// Definite integral of the price over `[from, to]`.
pub fn cost(shape: &CurveShape, from: U256, to: U256, config: &QuadratureConfig) -> Result<U256> {
    if from > to {
        return Err(TokenomicsError::InvalidSupply);
    }
    if from == to {
        return Ok(U256::zero());
    }

    match shape {
        CurveShape::Linear { slope, intercept } => polynomial_integral(*slope, *intercept, 1, from, to),
        CurveShape::Polynomial {
            slope,
            intercept,
            exponent,
        } => polynomial_integral(*slope, *intercept, *exponent, from, to),
        CurveShape::Bancor { .. } => Err(TokenomicsError::InvalidCurveType(
            "bancor curves are priced by reserve ratio".to_string(),
        )),
        _ => simpson(shape, from, to, config.simpson_steps),
    }
}

/// `slope * (to^(n+1) - from^(n+1)) / ((n+1) * PRECISION) + intercept * (to - from)`
fn polynomial_integral(
    slope: U256,
    intercept: U256,
    exponent: u32,
    from: U256,
    to: U256,
) -> Result<U256> {
    let degree = U256::from(exponent + 1);
    let upper = to
        .checked_pow(degree)
        .ok_or(TokenomicsError::OverflowProtection("polynomial integral"))?;
    let lower = from
        .checked_pow(degree)
        .ok_or(TokenomicsError::OverflowProtection("polynomial integral"))?;

    let denominator = degree
        .checked_mul(PRECISION)
        .ok_or(TokenomicsError::OverflowProtection("polynomial integral"))?;
    let variable = math::mul_div(slope, upper - lower, denominator)?;
    let fixed = intercept
        .checked_mul(to - from)
        .ok_or(TokenomicsError::OverflowProtection("polynomial integral"))?;

    math::checked_add(variable, fixed, "polynomial integral")
}

/// Composite Simpson's rule with weights 1, 4, 2, 4, ..., 4, 1
fn simpson(shape: &CurveShape, from: U256, to: U256, steps: u32) -> Result<U256> {
    if steps < 2 || steps % 2 != 0 {
        return Err(TokenomicsError::InvalidQuadrature(
            "simpson_steps must be even and at least 2",
        ));
    }

    let width = to - from;
    let n = U256::from(steps);
    let mut weighted = U256::zero();

    for i in 0..=steps {
        let x = from + math::mul_div(width, U256::from(i), n)?;
        let y = shape.price(x, U256::zero())?;
        let weight = if i == 0 || i == steps {
            1u64
        } else if i % 2 == 1 {
            4
        } else {
            2
        };
        let term = y
            .checked_mul(U256::from(weight))
            .ok_or(TokenomicsError::OverflowProtection("simpson"))?;
        weighted = math::checked_add(weighted, term, "simpson")?;
    }

    // h / 3 with h = width / steps
    math::mul_div(weighted, width, n * U256::from(3u8))
}

/// Largest token amount `t` with `cost(supply, supply + t) <= reserve_amount`.
pub fn tokens_for_reserve(
    shape: &CurveShape,
    supply: U256,
    reserve_amount: U256,
    config: &QuadratureConfig,
) -> Result<U256> {
    if reserve_amount.is_zero() {
        return Ok(U256::zero());
    }

    let within_budget = |amount: U256| -> bool {
        match supply
            .checked_add(amount)
            .ok_or(TokenomicsError::OverflowProtection("inversion"))
            .and_then(|end| cost(shape, supply, end, config))
        {
            Ok(spent) => spent <= reserve_amount,
            // Past the representable range the cost can only be larger
            Err(_) => false,
        }
    };

    let mut low = U256::zero();
    let mut high = estimate_upper_bound(shape, supply, reserve_amount, config, &within_budget)?;

    for _ in 0..config.search_iterations {
        if low >= high {
            break;
        }
        // upper midpoint without overflowing at U256::MAX
        let span = high - low;
        let mid = low + span / 2 + (span & U256::one());
        if within_budget(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    trace!(%supply, %reserve_amount, tokens = %low, "inverted cost");
    Ok(low)
}

/// Bound the search: `reserve / spot` when the spot price is positive,
/// otherwise double until the budget is exceeded.
fn estimate_upper_bound(
    shape: &CurveShape,
    supply: U256,
    reserve_amount: U256,
    config: &QuadratureConfig,
    within_budget: &dyn Fn(U256) -> bool,
) -> Result<U256> {
    let spot = shape.price(supply, U256::zero())?;
    if !spot.is_zero() {
        return Ok((reserve_amount / spot).saturating_add(U256::one()));
    }

    let mut high = U256::one();
    for _ in 0..config.search_iterations {
        if !within_budget(high) {
            return Ok(high);
        }
        match high.checked_mul(U256::from(2u8)) {
            Some(next) => high = next,
            None => return Ok(U256::MAX),
        }
    }
    Ok(high)
}
