// citrate/core/tokenomics/src/dynamic_supply.rs

use crate::error::{Result, TokenomicsError};
use crate::math::{self, BPS};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dynamic supply configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSupplyParams {
    /// Supply at launch, also the reference for the inflation rate
    pub base_supply: U256,

    /// Upper bound for any rebase
    pub max_supply: U256,

    /// Lower bound for any rebase
    pub min_supply: U256,

    /// Target inflation over base supply (basis points)
    pub target_inflation_bps: i64,

    /// Minimum seconds between rebases
    pub rebase_interval: u64,

    /// Share of the price deviation applied per rebase (basis points)
    pub damping_factor_bps: u32,

    /// Time the cooldown is counted from
    #[serde(default)]
    pub start_time: u64,
}

impl Default for DynamicSupplyParams {
    fn default() -> Self {
        let base = U256::from(1_000_000_000u64) * math::PRECISION; // 1B tokens
        Self {
            base_supply: base,
            max_supply: base * 2,
            min_supply: base / 2,
            target_inflation_bps: 200, // 2%
            rebase_interval: 86_400,   // daily
            damping_factor_bps: 1_000, // 10% of the deviation
            start_time: 0,
        }
    }
}

/// Proposed supply change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebaseAdjustment {
    /// Mint, price is above target
    Expand(U256),
    /// Burn, price is below target
    Contract(U256),
    Unchanged,
}

/// Result of an applied rebase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseOutcome {
    pub previous_supply: U256,
    pub new_supply: U256,
    /// Whether the bounds cut the requested adjustment
    pub clamped: bool,
}

/// Elastic supply controller.
///
/// State machine: idle until `last_rebase_time + rebase_interval`, then
/// eligible; an executed rebase returns it to idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSupply {
    base_supply: U256,
    current_supply: U256,
    max_supply: U256,
    min_supply: U256,
    target_inflation_bps: i64,
    last_rebase_time: u64,
    rebase_interval: u64,
    damping_factor_bps: u32,
}

impl DynamicSupply {
    pub fn initialize(params: &DynamicSupplyParams) -> Result<Self> {
        if params.base_supply.is_zero() || params.max_supply.is_zero() {
            return Err(TokenomicsError::InvalidSupply);
        }
        if params.min_supply > params.base_supply || params.base_supply > params.max_supply {
            return Err(TokenomicsError::InvalidSupply);
        }
        if U256::from(params.damping_factor_bps) > BPS {
            return Err(TokenomicsError::InvalidRebaseConfig("damping factor above 100%"));
        }
        if params.rebase_interval == 0 {
            return Err(TokenomicsError::InvalidRebaseConfig("rebase interval is zero"));
        }

        Ok(Self {
            base_supply: params.base_supply,
            current_supply: params.base_supply,
            max_supply: params.max_supply,
            min_supply: params.min_supply,
            target_inflation_bps: params.target_inflation_bps,
            last_rebase_time: params.start_time,
            rebase_interval: params.rebase_interval,
            damping_factor_bps: params.damping_factor_bps,
        })
    }

    pub fn current_supply(&self) -> U256 {
        self.current_supply
    }

    pub fn base_supply(&self) -> U256 {
        self.base_supply
    }

    pub fn bounds(&self) -> (U256, U256) {
        (self.min_supply, self.max_supply)
    }

    pub fn last_rebase_time(&self) -> u64 {
        self.last_rebase_time
    }

    pub fn next_rebase_time(&self) -> u64 {
        self.last_rebase_time.saturating_add(self.rebase_interval)
    }

    pub fn is_rebase_due(&self, now: u64) -> bool {
        now >= self.next_rebase_time()
    }

    /// Propose a supply change moving `current_price` toward `target_price`.
    ///
    /// The deviation in basis points is damped by `damping_factor_bps` and
    /// applied to the current supply. Returns `Unchanged` during cooldown.
    pub fn calculate_rebase(
        &self,
        now: u64,
        current_price: U256,
        target_price: U256,
    ) -> Result<RebaseAdjustment> {
        if target_price.is_zero() {
            return Err(TokenomicsError::InvalidPrice);
        }
        if !self.is_rebase_due(now) || current_price == target_price {
            return Ok(RebaseAdjustment::Unchanged);
        }

        let deviation_bps = math::mul_div(
            math::abs_diff(current_price, target_price),
            BPS,
            target_price,
        )?;
        let damped_bps = math::mul_div(deviation_bps, U256::from(self.damping_factor_bps), BPS)?;
        let delta = math::mul_div(self.current_supply, damped_bps, BPS)?;

        if delta.is_zero() {
            Ok(RebaseAdjustment::Unchanged)
        } else if current_price > target_price {
            Ok(RebaseAdjustment::Expand(delta))
        } else {
            Ok(RebaseAdjustment::Contract(delta))
        }
    }

    /// Apply `adjustment`, clamped to `[min_supply, max_supply]`
    pub fn execute_rebase(&mut self, now: u64, adjustment: RebaseAdjustment) -> Result<RebaseOutcome> {
        if !self.is_rebase_due(now) {
            return Err(TokenomicsError::RebaseCooldownActive(self.next_rebase_time()));
        }

        let previous_supply = self.current_supply;
        let requested = match adjustment {
            RebaseAdjustment::Expand(delta) => previous_supply.saturating_add(delta),
            RebaseAdjustment::Contract(delta) => previous_supply.saturating_sub(delta),
            RebaseAdjustment::Unchanged => previous_supply,
        };
        let new_supply = requested.max(self.min_supply).min(self.max_supply);

        self.current_supply = new_supply;
        self.last_rebase_time = now;

        debug!(
            previous = %previous_supply,
            new = %new_supply,
            clamped = requested != new_supply,
            "Supply rebased"
        );

        Ok(RebaseOutcome {
            previous_supply,
            new_supply,
            clamped: requested != new_supply,
        })
    }

    /// Signed change of current over base supply, in basis points
    pub fn current_inflation_rate(&self) -> Result<i64> {
        let magnitude = math::mul_div(
            math::abs_diff(self.current_supply, self.base_supply),
            BPS,
            self.base_supply,
        )?;
        let magnitude = if magnitude > U256::from(i64::MAX as u64) {
            i64::MAX
        } else {
            magnitude.low_u64() as i64
        };
        Ok(if self.current_supply >= self.base_supply {
            magnitude
        } else {
            -magnitude
        })
    }

    /// Current inflation minus the target, in basis points
    pub fn inflation_deviation(&self) -> Result<i64> {
        Ok(self
            .current_inflation_rate()?
            .saturating_sub(self.target_inflation_bps))
    }
}
