// citrate/core/tokenomics/src/bancor.rs

//! Constant reserve-ratio (Bancor) formulas.
//!
//! With reserve ratio `r = reserve_ratio_bps / BPS`, supply `S` and reserve `R`:
//! - spot price:      `R / (S * r)`
//! - purchase return: `S * ((1 + d / R)^r - 1)`
//! - purchase cost:   `R * ((1 + a / S)^(1/r) - 1)`
//! - sale return:     `R * (1 - (1 - a / S)^(1/r))`
//!
//! Every result is rounded in favour of the reserve.

use crate::error::{Result, TokenomicsError};
use crate::math::{self, BPS, PRECISION};
use primitive_types::U256;

fn ratio(reserve_ratio_bps: u32) -> Result<U256> {
    math::mul_div(U256::from(reserve_ratio_bps), PRECISION, BPS)
}

fn inverse_ratio(reserve_ratio_bps: u32) -> Result<U256> {
    math::mul_div(BPS, PRECISION, U256::from(reserve_ratio_bps))
}

fn ensure_funded(supply: U256, reserve: U256) -> Result<()> {
    if supply.is_zero() {
        return Err(TokenomicsError::InvalidSupply);
    }
    if reserve.is_zero() {
        return Err(TokenomicsError::InvalidReserve);
    }
    Ok(())
}

/// Spot price in fixed-point reserve units per token unit
pub fn spot_price(supply: U256, reserve: U256, reserve_ratio_bps: u32) -> Result<U256> {
    let denominator = supply
        .checked_mul(U256::from(reserve_ratio_bps))
        .ok_or(TokenomicsError::OverflowProtection("bancor spot price"))?;
    let numerator = reserve
        .checked_mul(BPS)
        .ok_or(TokenomicsError::OverflowProtection("bancor spot price"))?;
    math::mul_div(numerator, PRECISION, denominator)
}

/// Tokens minted for depositing `deposit` reserve units
pub fn purchase_return(
    supply: U256,
    reserve: U256,
    reserve_ratio_bps: u32,
    deposit: U256,
) -> Result<U256> {
    ensure_funded(supply, reserve)?;
    if deposit.is_zero() {
        return Ok(U256::zero());
    }

    let base = math::mul_div(
        math::checked_add(reserve, deposit, "bancor purchase")?,
        PRECISION,
        reserve,
    )?;
    let growth = math::pow_frac(base, ratio(reserve_ratio_bps)?)?;
    math::mul_div(supply, growth.saturating_sub(PRECISION), PRECISION)
}

/// Reserve units required to mint exactly `amount` tokens
pub fn purchase_cost(
    supply: U256,
    reserve: U256,
    reserve_ratio_bps: u32,
    amount: U256,
) -> Result<U256> {
    ensure_funded(supply, reserve)?;
    if amount.is_zero() {
        return Ok(U256::zero());
    }

    let base = math::mul_div_up(
        math::checked_add(supply, amount, "bancor cost")?,
        PRECISION,
        supply,
    )?;
    let growth = math::pow_frac(base, inverse_ratio(reserve_ratio_bps)?)?;
    math::mul_div_up(reserve, growth.saturating_sub(PRECISION), PRECISION)
}

/// Reserve units paid out for burning `amount` tokens
pub fn sale_return(
    supply: U256,
    reserve: U256,
    reserve_ratio_bps: u32,
    amount: U256,
) -> Result<U256> {
    if amount > supply {
        return Err(TokenomicsError::InsufficientTokens {
            requested: amount,
            supply,
        });
    }
    if amount.is_zero() {
        return Ok(U256::zero());
    }
    if amount == supply {
        return Ok(reserve);
    }

    // (1 - a/S)^(1/r) == e^-x with x = ln(S / (S - a)) / r
    let base = math::mul_div(supply, PRECISION, supply - amount).unwrap_or(U256::MAX);
    let x = math::mul_fixed(math::ln(base)?, inverse_ratio(reserve_ratio_bps)?)?;
    // beyond the exp domain, hold back e^-20 of the reserve
    let shrink = math::exp(x.min(math::MAX_EXP_ARG))?;
    let retained = math::mul_div_up(reserve, PRECISION, shrink)?;
    Ok(reserve.saturating_sub(retained))
}
