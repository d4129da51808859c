// citrate/core/tokenomics/src/emission.rs

use crate::error::{Result, TokenomicsError};
use crate::math::{self, BPS, PRECISION};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Emission schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionParams {
    /// Tokens per second during the first epoch
    pub initial_rate: U256,

    /// Rate reduction per elapsed epoch (basis points)
    pub decay_rate_bps: u32,

    /// Epoch length in seconds
    pub epoch_duration: u64,

    pub start_time: u64,

    /// Floor for the decayed rate
    pub min_rate: U256,

    /// Lifetime emission cap, zero for uncapped
    #[serde(default)]
    pub max_total_emission: U256,
}

/// Epoch-decaying emission schedule.
///
/// The rate after `n` whole epochs is `initial_rate * (1 - decay)^n`,
/// floored at `min_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionSchedule {
    initial_rate: U256,
    decay_rate_bps: u32,
    epoch_duration: u64,
    start_time: u64,
    min_rate: U256,
    total_emitted: U256,
    last_claim_time: u64,
    max_total_emission: U256,
}

impl EmissionSchedule {
    pub fn initialize(params: &EmissionParams) -> Result<Self> {
        if params.epoch_duration == 0 {
            return Err(TokenomicsError::InvalidEmissionSchedule("epoch duration is zero"));
        }
        if U256::from(params.decay_rate_bps) > BPS {
            return Err(TokenomicsError::InvalidEmissionSchedule("decay above 100%"));
        }
        if params.min_rate > params.initial_rate {
            return Err(TokenomicsError::InvalidEmissionSchedule(
                "minimum rate above initial rate",
            ));
        }

        Ok(Self {
            initial_rate: params.initial_rate,
            decay_rate_bps: params.decay_rate_bps,
            epoch_duration: params.epoch_duration,
            start_time: params.start_time,
            min_rate: params.min_rate,
            total_emitted: U256::zero(),
            last_claim_time: params.start_time,
            max_total_emission: params.max_total_emission,
        })
    }

    pub fn total_emitted(&self) -> U256 {
        self.total_emitted
    }

    pub fn last_claim_time(&self) -> u64 {
        self.last_claim_time
    }

    /// Whole epochs elapsed at `time`
    pub fn current_epoch(&self, time: u64) -> u64 {
        time.saturating_sub(self.start_time) / self.epoch_duration
    }

    pub fn emission_rate_at(&self, time: u64) -> Result<U256> {
        let epochs = self.current_epoch(time);
        if epochs == 0 || self.decay_rate_bps == 0 {
            return Ok(self.initial_rate);
        }

        let retained = math::mul_div(
            BPS - U256::from(self.decay_rate_bps),
            PRECISION,
            BPS,
        )?;
        let factor = math::pow(retained, epochs)?;
        let rate = math::mul_fixed(self.initial_rate, factor)?;
        Ok(rate.max(self.min_rate))
    }

    pub fn get_current_emission_rate(&self, now: u64) -> Result<U256> {
        self.emission_rate_at(now)
    }

    /// Trapezoidal estimate of the emission between `last_claim` and `now`
    pub fn calculate_pending_emissions(&self, last_claim: u64, now: u64) -> Result<U256> {
        if now <= last_claim {
            return Ok(U256::zero());
        }

        let start_rate = self.emission_rate_at(last_claim)?;
        let end_rate = self.emission_rate_at(now)?;
        let average = math::checked_add(start_rate, end_rate, "emission")? / 2;
        let pending = average
            .checked_mul(U256::from(now - last_claim))
            .ok_or(TokenomicsError::OverflowProtection("emission"))?;

        Ok(match self.remaining_emission() {
            Some(remaining) => pending.min(remaining),
            None => pending,
        })
    }

    /// Claim everything pending since the previous claim
    pub fn claim_emissions(&mut self, now: u64) -> Result<U256> {
        let pending = self.calculate_pending_emissions(self.last_claim_time, now)?;
        let total = math::checked_add(self.total_emitted, pending, "total emitted")?;

        self.total_emitted = total;
        self.last_claim_time = self.last_claim_time.max(now);

        debug!(
            amount = %pending,
            total = %self.total_emitted,
            epoch = self.current_epoch(now),
            "Emissions claimed"
        );

        Ok(pending)
    }

    /// Tokens left under the cap, `None` when uncapped
    pub fn remaining_emission(&self) -> Option<U256> {
        if self.max_total_emission.is_zero() {
            None
        } else {
            Some(self.max_total_emission.saturating_sub(self.total_emitted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EmissionParams {
        EmissionParams {
            initial_rate: U256::from(1_000u64),
            decay_rate_bps: 1_000,
            epoch_duration: 100,
            start_time: 500,
            min_rate: U256::from(500u64),
            max_total_emission: U256::zero(),
        }
    }

    #[test]
    fn test_rate_decays_per_epoch() {
        let schedule = EmissionSchedule::initialize(&params()).unwrap();
        assert_eq!(schedule.emission_rate_at(0).unwrap(), U256::from(1_000u64));
        assert_eq!(schedule.emission_rate_at(599).unwrap(), U256::from(1_000u64));
        assert_eq!(schedule.emission_rate_at(600).unwrap(), U256::from(900u64));
        assert_eq!(schedule.emission_rate_at(700).unwrap(), U256::from(810u64));
        assert_eq!(schedule.emission_rate_at(800).unwrap(), U256::from(729u64));
        // floored at min_rate
        assert_eq!(schedule.emission_rate_at(10_000).unwrap(), U256::from(500u64));
        assert_eq!(schedule.emission_rate_at(u64::MAX).unwrap(), U256::from(500u64));
    }

    #[test]
    fn test_invalid_schedule() {
        let mut bad = params();
        bad.epoch_duration = 0;
        assert!(EmissionSchedule::initialize(&bad).is_err());

        let mut bad = params();
        bad.min_rate = U256::from(2_000u64);
        assert!(EmissionSchedule::initialize(&bad).is_err());

        let mut bad = params();
        bad.decay_rate_bps = 10_001;
        assert!(EmissionSchedule::initialize(&bad).is_err());
    }

    #[test]
    fn test_pending_is_trapezoidal() {
        let schedule = EmissionSchedule::initialize(&params()).unwrap();
        // (1000 + 900) / 2 * 100
        assert_eq!(
            schedule.calculate_pending_emissions(500, 600).unwrap(),
            U256::from(95_000u64)
        );
        assert_eq!(
            schedule.calculate_pending_emissions(600, 600).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn test_claim_advances_checkpoint() {
        let mut schedule = EmissionSchedule::initialize(&params()).unwrap();
        assert_eq!(schedule.claim_emissions(550).unwrap(), U256::from(50_000u64));
        assert_eq!(schedule.claim_emissions(550).unwrap(), U256::zero());
        assert_eq!(schedule.last_claim_time(), 550);
        assert_eq!(schedule.total_emitted(), U256::from(50_000u64));
    }

    #[test]
    fn test_cap_limits_emission() {
        let mut capped = params();
        capped.max_total_emission = U256::from(60_000u64);
        let mut schedule = EmissionSchedule::initialize(&capped).unwrap();
        assert_eq!(schedule.claim_emissions(550).unwrap(), U256::from(50_000u64));
        assert_eq!(schedule.claim_emissions(600).unwrap(), U256::from(10_000u64));
        assert_eq!(schedule.claim_emissions(700).unwrap(), U256::zero());
        assert_eq!(schedule.remaining_emission(), Some(U256::zero()));
    }
}
