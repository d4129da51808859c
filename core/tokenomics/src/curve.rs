// citrate/core/tokenomics/src/curve.rs

//! Curve shapes and instantaneous pricing.
//!
//! Supply and reserve amounts are integer base units. Slopes, growth rates
//! and steepness are fixed-point values scaled by `PRECISION`. Every
//! coefficient is unsigned, so each shape is non-decreasing in supply.

use crate::bancor;
use crate::error::{Result, TokenomicsError};
use crate::math::{self, BPS, PRECISION};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest polynomial degree accepted by `Polynomial` curves
pub const MAX_POLYNOMIAL_EXPONENT: u32 = 5;

/// Curve type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Linear,
    Polynomial,
    Exponential,
    Logarithmic,
    Sigmoid,
    Bancor,
}

impl CurveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::Polynomial => "polynomial",
            CurveKind::Exponential => "exponential",
            CurveKind::Logarithmic => "logarithmic",
            CurveKind::Sigmoid => "sigmoid",
            CurveKind::Bancor => "bancor",
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for CurveKind {
    type Error = TokenomicsError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(CurveKind::Linear),
            1 => Ok(CurveKind::Polynomial),
            2 => Ok(CurveKind::Exponential),
            3 => Ok(CurveKind::Logarithmic),
            4 => Ok(CurveKind::Sigmoid),
            5 => Ok(CurveKind::Bancor),
            other => Err(TokenomicsError::InvalidCurveType(other.to_string())),
        }
    }
}

impl FromStr for CurveKind {
    type Err = TokenomicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(CurveKind::Linear),
            "polynomial" => Ok(CurveKind::Polynomial),
            "exponential" => Ok(CurveKind::Exponential),
            "logarithmic" => Ok(CurveKind::Logarithmic),
            "sigmoid" => Ok(CurveKind::Sigmoid),
            "bancor" => Ok(CurveKind::Bancor),
            _ => Err(TokenomicsError::InvalidCurveType(s.to_string())),
        }
    }
}

/// Curve shape with the coefficients that shape actually uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveShape {
    /// `slope * s / PRECISION + intercept`
    Linear { slope: U256, intercept: U256 },

    /// `slope * s^exponent / PRECISION + intercept`
    Polynomial {
        slope: U256,
        intercept: U256,
        exponent: u32,
    },

    /// `slope * e^(rate * s / PRECISION) / PRECISION`
    Exponential { slope: U256, rate: U256 },

    /// `slope * ln(1 + s / PRECISION) / PRECISION + intercept`
    Logarithmic { slope: U256, intercept: U256 },

    /// `max_price / (1 + e^(-steepness * (s - midpoint)))`
    Sigmoid {
        max_price: U256,
        steepness: U256,
        midpoint: U256,
    },

    /// Constant reserve ratio; `initial_price` quotes an empty curve
    Bancor {
        reserve_ratio_bps: u32,
        #[serde(default)]
        initial_price: U256,
    },
}

impl CurveShape {
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveShape::Linear { .. } => CurveKind::Linear,
            CurveShape::Polynomial { .. } => CurveKind::Polynomial,
            CurveShape::Exponential { .. } => CurveKind::Exponential,
            CurveShape::Logarithmic { .. } => CurveKind::Logarithmic,
            CurveShape::Sigmoid { .. } => CurveKind::Sigmoid,
            CurveShape::Bancor { .. } => CurveKind::Bancor,
        }
    }

    /// Whether cost is computed from an exact antiderivative
    pub fn has_closed_form(&self) -> bool {
        matches!(
            self,
            CurveShape::Linear { .. } | CurveShape::Polynomial { .. }
        )
    }

    /// Whether [`CurveShape::price`] is scaled by `PRECISION`. Only Bancor
    /// prices are; the other shapes price in raw reserve units per base unit.
    pub fn price_is_fixed_point(&self) -> bool {
        matches!(self, CurveShape::Bancor { .. })
    }

    /// Reject malformed coefficients
    pub fn validate(&self) -> Result<()> {
        match self {
            CurveShape::Linear { slope, .. }
            | CurveShape::Exponential { slope, .. }
            | CurveShape::Logarithmic { slope, .. } => {
                if slope.is_zero() {
                    return Err(TokenomicsError::InvalidSlope);
                }
            }
            CurveShape::Polynomial {
                slope, exponent, ..
            } => {
                if slope.is_zero() {
                    return Err(TokenomicsError::InvalidSlope);
                }
                if *exponent == 0 || *exponent > MAX_POLYNOMIAL_EXPONENT {
                    return Err(TokenomicsError::InvalidExponent(*exponent));
                }
            }
            CurveShape::Sigmoid { max_price, .. } => {
                if max_price.is_zero() {
                    return Err(TokenomicsError::InvalidSlope);
                }
            }
            CurveShape::Bancor {
                reserve_ratio_bps, ..
            } => {
                if *reserve_ratio_bps == 0 || U256::from(*reserve_ratio_bps) > BPS {
                    return Err(TokenomicsError::InvalidReserveRatio(*reserve_ratio_bps));
                }
            }
        }
        Ok(())
    }

    /// Instantaneous price at `supply`.
    ///
    /// `reserve` is only read by Bancor curves, whose price is the current
    /// reserve over supply scaled by the reserve ratio.
    pub fn price(&self, supply: U256, reserve: U256) -> Result<U256> {
        match self {
            CurveShape::Linear { slope, intercept } => {
                math::checked_add(math::mul_fixed(*slope, supply)?, *intercept, "linear price")
            }
            CurveShape::Polynomial {
                slope,
                intercept,
                exponent,
            } => {
                let powered = supply
                    .checked_pow(U256::from(*exponent))
                    .ok_or(TokenomicsError::OverflowProtection("polynomial price"))?;
                math::checked_add(
                    math::mul_fixed(*slope, powered)?,
                    *intercept,
                    "polynomial price",
                )
            }
            CurveShape::Exponential { slope, rate } => {
                let growth = math::exp(math::mul_fixed(*rate, supply)?)?;
                math::mul_fixed(*slope, growth)
            }
            CurveShape::Logarithmic { slope, intercept } => {
                let log = math::ln(math::checked_add(PRECISION, supply, "logarithmic price")?)?;
                math::checked_add(math::mul_fixed(*slope, log)?, *intercept, "logarithmic price")
            }
            CurveShape::Sigmoid {
                max_price,
                steepness,
                midpoint,
            } => {
                let distance = math::mul_fixed(*steepness, math::abs_diff(supply, *midpoint))
                    .unwrap_or(U256::MAX);
                if distance > math::MAX_EXP_ARG {
                    // saturated: within e^-20 of the asymptote
                    return Ok(if supply >= *midpoint {
                        *max_price
                    } else {
                        U256::zero()
                    });
                }
                let e = math::exp(distance)?;
                if supply >= *midpoint {
                    // L * e^z / (e^z + 1)
                    math::mul_div(*max_price, e, e + PRECISION)
                } else {
                    // L / (1 + e^z)
                    math::mul_div(*max_price, PRECISION, PRECISION + e)
                }
            }
            CurveShape::Bancor {
                reserve_ratio_bps,
                initial_price,
            } => {
                if supply.is_zero() {
                    return Ok(*initial_price);
                }
                bancor::spot_price(supply, reserve, *reserve_ratio_bps)
            }
        }
    }
}
