// citrate/core/tokenomics/src/bonding_curve.rs

use crate::bancor;
use crate::curve::{CurveKind, CurveShape};
use crate::error::{Result, TokenomicsError};
use crate::integration::{self, QuadratureConfig};
use crate::math::{self, PRECISION};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Curve description used to build a [`BondingCurve`] from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    #[serde(flatten)]
    pub shape: CurveShape,

    /// Supply already in circulation when the curve opens (Bancor only)
    #[serde(default)]
    pub initial_supply: U256,

    /// Reserve backing `initial_supply` (Bancor only)
    #[serde(default)]
    pub initial_reserve: U256,
}

/// Priced view of a trade without committing it.
///
/// Spot prices carry the unit of [`CurveShape::price`]: Bancor curves quote
/// fixed-point reserve per token (`PRECISION` = 1.0), every other shape
/// quotes raw reserve units per token base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    pub amount_in: U256,
    pub amount_out: U256,
    pub spot_price_before: U256,
    pub spot_price_after: U256,
    /// Reserve per token in fixed-point (`PRECISION` = 1.0)
    pub average_price: U256,
}

/// Bonding curve controller.
///
/// Owns the circulating supply and the reserve backing it. Buys and sells
/// run every check first and only then move both balances together, so a
/// failed call leaves the curve untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurve {
    shape: Option<CurveShape>,
    current_supply: U256,
    reserve_balance: U256,
    #[serde(default)]
    quadrature: QuadratureConfig,
}

impl BondingCurve {
    /// Uninitialized curve with default quadrature settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Uninitialized curve with custom quadrature settings
    pub fn with_quadrature(quadrature: QuadratureConfig) -> Result<Self> {
        quadrature.validate()?;
        Ok(Self {
            quadrature,
            ..Self::default()
        })
    }

    /// Build and initialize a curve from configuration
    pub fn from_params(params: &CurveParams, quadrature: QuadratureConfig) -> Result<Self> {
        let mut curve = Self::with_quadrature(quadrature)?;
        curve.install(
            params.shape.clone(),
            params.initial_supply,
            params.initial_reserve,
        )?;
        Ok(curve)
    }

    pub fn initialize_linear(&mut self, slope: U256, intercept: U256) -> Result<()> {
        self.install(
            CurveShape::Linear { slope, intercept },
            U256::zero(),
            U256::zero(),
        )
    }

    pub fn initialize_polynomial(
        &mut self,
        slope: U256,
        intercept: U256,
        exponent: u32,
    ) -> Result<()> {
        self.install(
            CurveShape::Polynomial {
                slope,
                intercept,
                exponent,
            },
            U256::zero(),
            U256::zero(),
        )
    }

    pub fn initialize_exponential(&mut self, slope: U256, rate: U256) -> Result<()> {
        self.install(
            CurveShape::Exponential { slope, rate },
            U256::zero(),
            U256::zero(),
        )
    }

    pub fn initialize_logarithmic(&mut self, slope: U256, intercept: U256) -> Result<()> {
        self.install(
            CurveShape::Logarithmic { slope, intercept },
            U256::zero(),
            U256::zero(),
        )
    }

    pub fn initialize_sigmoid(
        &mut self,
        max_price: U256,
        steepness: U256,
        midpoint: U256,
    ) -> Result<()> {
        self.install(
            CurveShape::Sigmoid {
                max_price,
                steepness,
                midpoint,
            },
            U256::zero(),
            U256::zero(),
        )
    }

    /// Bancor curves need a funded starting point: both the initial supply
    /// and the reserve backing it must be positive.
    pub fn initialize_bancor(
        &mut self,
        reserve_ratio_bps: u32,
        initial_supply: U256,
        initial_reserve: U256,
    ) -> Result<()> {
        self.install(
            CurveShape::Bancor {
                reserve_ratio_bps,
                initial_price: U256::zero(),
            },
            initial_supply,
            initial_reserve,
        )
    }

    fn install(&mut self, shape: CurveShape, supply: U256, reserve: U256) -> Result<()> {
        if self.shape.is_some() {
            return Err(TokenomicsError::CurveAlreadyInitialized);
        }
        shape.validate()?;

        // Bancor opens funded, every other shape opens empty
        let funded = matches!(shape, CurveShape::Bancor { .. });
        if supply.is_zero() == funded {
            return Err(TokenomicsError::InvalidSupply);
        }
        if reserve.is_zero() == funded {
            return Err(TokenomicsError::InvalidReserve);
        }

        debug!(
            kind = %shape.kind(),
            supply = %supply,
            reserve = %reserve,
            "Bonding curve initialized"
        );

        self.shape = Some(shape);
        self.current_supply = supply;
        self.reserve_balance = reserve;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.shape.is_some()
    }

    pub fn shape(&self) -> Result<&CurveShape> {
        self.shape.as_ref().ok_or(TokenomicsError::CurveNotInitialized)
    }

    pub fn kind(&self) -> Result<CurveKind> {
        self.shape().map(CurveShape::kind)
    }

    pub fn current_supply(&self) -> U256 {
        self.current_supply
    }

    pub fn reserve_balance(&self) -> U256 {
        self.reserve_balance
    }

    pub fn quadrature(&self) -> &QuadratureConfig {
        &self.quadrature
    }

    /// Price at the current supply
    pub fn get_spot_price(&self) -> Result<U256> {
        self.get_price_at_supply(self.current_supply)
    }

    /// Price at an arbitrary supply point. Bancor curves price against the
    /// current reserve balance.
    pub fn get_price_at_supply(&self, supply: U256) -> Result<U256> {
        self.shape()?.price(supply, self.reserve_balance)
    }

    /// Spot price times circulating supply, in raw reserve units for every
    /// shape
    pub fn market_cap(&self) -> Result<U256> {
        let spot = self.get_spot_price()?;
        if self.shape()?.price_is_fixed_point() {
            math::mul_fixed(spot, self.current_supply)
        } else {
            spot.checked_mul(self.current_supply)
                .ok_or(TokenomicsError::OverflowProtection("market cap"))
        }
    }

    /// Reserve required to mint `amount` tokens
    pub fn calculate_buy_cost(&self, amount: U256) -> Result<U256> {
        let shape = self.shape()?;
        match shape {
            CurveShape::Bancor {
                reserve_ratio_bps, ..
            } => bancor::purchase_cost(
                self.current_supply,
                self.reserve_balance,
                *reserve_ratio_bps,
                amount,
            ),
            _ => {
                let to = math::checked_add(self.current_supply, amount, "buy cost")?;
                integration::cost(shape, self.current_supply, to, &self.quadrature)
            }
        }
    }

    /// Reserve paid out for burning `amount` tokens
    pub fn calculate_sell_return(&self, amount: U256) -> Result<U256> {
        let shape = self.shape()?;
        if amount > self.current_supply {
            return Err(TokenomicsError::InsufficientTokens {
                requested: amount,
                supply: self.current_supply,
            });
        }
        match shape {
            CurveShape::Bancor {
                reserve_ratio_bps, ..
            } => bancor::sale_return(
                self.current_supply,
                self.reserve_balance,
                *reserve_ratio_bps,
                amount,
            ),
            _ => integration::cost(
                shape,
                self.current_supply - amount,
                self.current_supply,
                &self.quadrature,
            ),
        }
    }

    /// Tokens minted for depositing `reserve_in`
    pub fn calculate_purchase_return(&self, reserve_in: U256) -> Result<U256> {
        let shape = self.shape()?;
        match shape {
            CurveShape::Bancor {
                reserve_ratio_bps, ..
            } => bancor::purchase_return(
                self.current_supply,
                self.reserve_balance,
                *reserve_ratio_bps,
                reserve_in,
            ),
            _ => integration::tokens_for_reserve(
                shape,
                self.current_supply,
                reserve_in,
                &self.quadrature,
            ),
        }
    }

    pub fn quote_buy(&self, reserve_in: U256) -> Result<TradeQuote> {
        let tokens_out = self.calculate_purchase_return(reserve_in)?;
        let after_supply = math::checked_add(self.current_supply, tokens_out, "quote")?;
        let after_reserve = math::checked_add(self.reserve_balance, reserve_in, "quote")?;
        self.quote(reserve_in, tokens_out, reserve_in, tokens_out, after_supply, after_reserve)
    }

    pub fn quote_sell(&self, tokens_in: U256) -> Result<TradeQuote> {
        let reserve_out = self.calculate_sell_return(tokens_in)?;
        let after_supply = self.current_supply - tokens_in;
        let after_reserve = self.reserve_balance.saturating_sub(reserve_out);
        self.quote(tokens_in, reserve_out, reserve_out, tokens_in, after_supply, after_reserve)
    }

    fn quote(
        &self,
        amount_in: U256,
        amount_out: U256,
        reserve_leg: U256,
        token_leg: U256,
        after_supply: U256,
        after_reserve: U256,
    ) -> Result<TradeQuote> {
        let shape = self.shape()?;
        let average_price = if token_leg.is_zero() {
            U256::zero()
        } else {
            math::mul_div(reserve_leg, PRECISION, token_leg)?
        };
        Ok(TradeQuote {
            amount_in,
            amount_out,
            spot_price_before: self.get_spot_price()?,
            spot_price_after: shape.price(after_supply, after_reserve)?,
            average_price,
        })
    }

    /// Deposit `reserve_in` and mint at least `min_tokens_out`
    pub fn execute_buy(&mut self, reserve_in: U256, min_tokens_out: U256) -> Result<U256> {
        self.shape()?;
        if reserve_in.is_zero() {
            return Err(TokenomicsError::ZeroAmount);
        }

        let tokens_out = self.calculate_purchase_return(reserve_in)?;
        if tokens_out < min_tokens_out {
            return Err(TokenomicsError::SlippageExceeded {
                expected: min_tokens_out,
                actual: tokens_out,
            });
        }
        if tokens_out.is_zero() {
            return Err(TokenomicsError::InsufficientReserve);
        }

        let new_supply = math::checked_add(self.current_supply, tokens_out, "supply")?;
        let new_reserve = math::checked_add(self.reserve_balance, reserve_in, "reserve")?;

        self.current_supply = new_supply;
        self.reserve_balance = new_reserve;

        debug!(
            reserve_in = %reserve_in,
            tokens_out = %tokens_out,
            supply = %self.current_supply,
            reserve = %self.reserve_balance,
            "Bonding curve buy executed"
        );

        Ok(tokens_out)
    }

    /// Burn `tokens_in` and pay out at least `min_reserve_out`
    pub fn execute_sell(&mut self, tokens_in: U256, min_reserve_out: U256) -> Result<U256> {
        self.shape()?;
        if tokens_in.is_zero() {
            return Err(TokenomicsError::ZeroAmount);
        }

        let reserve_out = self.calculate_sell_return(tokens_in)?;
        if reserve_out < min_reserve_out {
            return Err(TokenomicsError::SlippageExceeded {
                expected: min_reserve_out,
                actual: reserve_out,
            });
        }
        if reserve_out > self.reserve_balance {
            return Err(TokenomicsError::InsufficientLiquidity {
                requested: reserve_out,
                available: self.reserve_balance,
            });
        }

        self.current_supply -= tokens_in;
        self.reserve_balance -= reserve_out;

        debug!(
            tokens_in = %tokens_in,
            reserve_out = %reserve_out,
            supply = %self.current_supply,
            reserve = %self.reserve_balance,
            "Bonding curve sell executed"
        );

        Ok(reserve_out)
    }
}
