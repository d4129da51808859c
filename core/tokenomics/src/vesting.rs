// citrate/core/tokenomics/src/vesting.rs

use crate::error::{Result, TokenomicsError};
use crate::math::{self, BPS};
use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for a new vesting schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingParams {
    pub total_amount: U256,
    pub start_time: u64,
    pub cliff_duration: u64,
    pub vesting_duration: u64,
    #[serde(default)]
    pub revocable: bool,
}

/// Cliff plus linear vesting schedule.
///
/// Nothing vests before `start_time + cliff_duration`; after that the vested
/// amount is the linear share of `total_amount` elapsed since `start_time`,
/// reaching the full amount at `start_time + vesting_duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    total_amount: U256,
    start_time: u64,
    cliff_duration: u64,
    vesting_duration: u64,
    released_amount: U256,
    #[serde(default)]
    last_release_time: Option<u64>,
    revoked_time: Option<u64>,
    revocable: bool,
}

impl VestingSchedule {
    pub fn new(params: &VestingParams) -> Result<Self> {
        if params.total_amount.is_zero() {
            return Err(TokenomicsError::InvalidVestingSchedule("total amount is zero"));
        }
        if params.vesting_duration == 0 {
            return Err(TokenomicsError::InvalidVestingSchedule("vesting duration is zero"));
        }
        if params.cliff_duration > params.vesting_duration {
            return Err(TokenomicsError::InvalidVestingSchedule(
                "cliff longer than vesting duration",
            ));
        }
        if params.start_time.checked_add(params.vesting_duration).is_none() {
            return Err(TokenomicsError::InvalidVestingSchedule("end time overflows"));
        }

        Ok(Self {
            total_amount: params.total_amount,
            start_time: params.start_time,
            cliff_duration: params.cliff_duration,
            vesting_duration: params.vesting_duration,
            released_amount: U256::zero(),
            last_release_time: None,
            revoked_time: None,
            revocable: params.revocable,
        })
    }

    pub fn total_amount(&self) -> U256 {
        self.total_amount
    }

    pub fn released_amount(&self) -> U256 {
        self.released_amount
    }

    pub fn revoked_time(&self) -> Option<u64> {
        self.revoked_time
    }

    pub fn is_revocable(&self) -> bool {
        self.revocable
    }

    pub fn cliff_end(&self) -> u64 {
        self.start_time + self.cliff_duration
    }

    pub fn end_time(&self) -> u64 {
        self.start_time + self.vesting_duration
    }

    /// Amount vested at `time`, frozen at the revocation instant if revoked
    pub fn vested_amount_at(&self, time: u64) -> U256 {
        let effective = match self.revoked_time {
            Some(revoked) => time.min(revoked),
            None => time,
        };

        if effective < self.cliff_end() {
            return U256::zero();
        }
        if effective >= self.end_time() {
            return self.total_amount;
        }

        let elapsed = effective - self.start_time;
        let share = self.total_amount.full_mul(U256::from(elapsed))
            / U512::from(self.vesting_duration);
        // elapsed < vesting_duration keeps the share below total_amount
        U256::try_from(share).unwrap_or(self.total_amount)
    }

    pub fn releasable_amount(&self, now: u64) -> U256 {
        self.vested_amount_at(now)
            .saturating_sub(self.released_amount)
    }

    /// Release everything vested so far
    pub fn release(&mut self, now: u64) -> Result<U256> {
        let effective = self.revoked_time.map_or(now, |revoked| now.min(revoked));
        if effective < self.cliff_end() {
            return Err(TokenomicsError::CliffNotReached(self.cliff_end()));
        }

        let releasable = self.releasable_amount(now);
        if releasable.is_zero() {
            return Err(TokenomicsError::NothingToVest);
        }

        self.released_amount = math::checked_add(self.released_amount, releasable, "release")?;
        self.last_release_time = Some(now);

        debug!(
            amount = %releasable,
            released = %self.released_amount,
            total = %self.total_amount,
            "Vesting release"
        );

        Ok(releasable)
    }

    /// Stop vesting at `now`; returns the amount that will never vest.
    ///
    /// A `now` earlier than the last release is moved up to it, so the
    /// frozen vested amount never drops below what was already released.
    pub fn revoke(&mut self, now: u64) -> Result<U256> {
        if !self.revocable {
            return Err(TokenomicsError::NotRevocable);
        }
        if let Some(revoked) = self.revoked_time {
            return Err(TokenomicsError::AlreadyRevoked(revoked));
        }

        let at = self.last_release_time.map_or(now, |released| now.max(released));
        let unvested = self.total_amount - self.vested_amount_at(at);
        self.revoked_time = Some(at);

        debug!(at, unvested = %unvested, "Vesting revoked");

        Ok(unvested)
    }

    /// Vested share of the total in basis points
    pub fn vesting_progress(&self, now: u64) -> Result<u32> {
        let progress = math::mul_div(self.vested_amount_at(now), BPS, self.total_amount)?;
        Ok(progress.low_u32())
    }
}

/// Holds at most one vesting schedule for a beneficiary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingWallet {
    schedule: Option<VestingSchedule>,
}

impl VestingWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_vesting_schedule(&mut self, params: &VestingParams) -> Result<&VestingSchedule> {
        if self.schedule.is_some() {
            return Err(TokenomicsError::VestingAlreadyStarted);
        }
        let schedule = VestingSchedule::new(params)?;
        debug!(
            total = %schedule.total_amount,
            start = schedule.start_time,
            cliff = schedule.cliff_duration,
            duration = schedule.vesting_duration,
            "Vesting schedule created"
        );
        Ok(self.schedule.insert(schedule))
    }

    pub fn schedule(&self) -> Result<&VestingSchedule> {
        self.schedule.as_ref().ok_or(TokenomicsError::VestingNotCreated)
    }

    fn schedule_mut(&mut self) -> Result<&mut VestingSchedule> {
        self.schedule.as_mut().ok_or(TokenomicsError::VestingNotCreated)
    }

    pub fn vested_amount(&self, now: u64) -> Result<U256> {
        self.vested_amount_at(now)
    }

    pub fn vested_amount_at(&self, time: u64) -> Result<U256> {
        Ok(self.schedule()?.vested_amount_at(time))
    }

    pub fn releasable_amount(&self, now: u64) -> Result<U256> {
        Ok(self.schedule()?.releasable_amount(now))
    }

    pub fn release(&mut self, now: u64) -> Result<U256> {
        self.schedule_mut()?.release(now)
    }

    pub fn revoke(&mut self, now: u64) -> Result<U256> {
        self.schedule_mut()?.revoke(now)
    }

    pub fn get_vesting_progress(&self, now: u64) -> Result<u32> {
        self.schedule()?.vesting_progress(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(revocable: bool) -> VestingParams {
        VestingParams {
            total_amount: U256::from(1_000_000u64),
            start_time: 1_000,
            cliff_duration: 100,
            vesting_duration: 1_000,
            revocable,
        }
    }

    #[test]
    fn test_vesting_curve() {
        let schedule = VestingSchedule::new(&params(false)).unwrap();
        assert_eq!(schedule.vested_amount_at(0), U256::zero());
        assert_eq!(schedule.vested_amount_at(1_000), U256::zero());
        assert_eq!(schedule.vested_amount_at(1_099), U256::zero());
        // at the cliff the linear share since start becomes available
        assert_eq!(schedule.vested_amount_at(1_100), U256::from(100_000u64));
        assert_eq!(schedule.vested_amount_at(1_500), U256::from(500_000u64));
        assert_eq!(schedule.vested_amount_at(2_000), U256::from(1_000_000u64));
        assert_eq!(schedule.vested_amount_at(9_999), U256::from(1_000_000u64));
    }

    #[test]
    fn test_invalid_schedules() {
        let mut bad = params(false);
        bad.total_amount = U256::zero();
        assert!(matches!(
            VestingSchedule::new(&bad),
            Err(TokenomicsError::InvalidVestingSchedule(_))
        ));

        let mut bad = params(false);
        bad.cliff_duration = 1_001;
        assert!(matches!(
            VestingSchedule::new(&bad),
            Err(TokenomicsError::InvalidVestingSchedule(_))
        ));

        let mut bad = params(false);
        bad.vesting_duration = 0;
        bad.cliff_duration = 0;
        assert!(matches!(
            VestingSchedule::new(&bad),
            Err(TokenomicsError::InvalidVestingSchedule(_))
        ));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut schedule = VestingSchedule::new(&params(false)).unwrap();
        assert_eq!(schedule.release(1_050), Err(TokenomicsError::CliffNotReached(1_100)));

        assert_eq!(schedule.release(1_250).unwrap(), U256::from(250_000u64));
        assert_eq!(schedule.releasable_amount(1_250), U256::zero());
        assert_eq!(schedule.release(1_250), Err(TokenomicsError::NothingToVest));

        assert_eq!(schedule.release(3_000).unwrap(), U256::from(750_000u64));
        assert_eq!(schedule.released_amount(), schedule.total_amount());
    }

    #[test]
    fn test_revoke_freezes_vesting() {
        let mut schedule = VestingSchedule::new(&params(true)).unwrap();
        let unvested = schedule.revoke(1_400).unwrap();
        assert_eq!(unvested, U256::from(600_000u64));
        assert_eq!(schedule.vested_amount_at(1_400), U256::from(400_000u64));
        assert_eq!(schedule.vested_amount_at(5_000), U256::from(400_000u64));
        assert_eq!(schedule.revoke(1_500), Err(TokenomicsError::AlreadyRevoked(1_400)));

        // vested-but-unreleased remains claimable after revocation
        assert_eq!(schedule.release(9_000).unwrap(), U256::from(400_000u64));
    }

    #[test]
    fn test_revoke_never_undercuts_released_amount() {
        let mut schedule = VestingSchedule::new(&params(true)).unwrap();
        assert_eq!(schedule.release(1_500).unwrap(), U256::from(500_000u64));

        // a stale timestamp is moved up to the last release
        assert_eq!(schedule.revoke(1_200).unwrap(), U256::from(500_000u64));
        assert_eq!(schedule.revoked_time(), Some(1_500));
        assert!(schedule.vested_amount_at(9_000) >= schedule.released_amount());
        assert_eq!(schedule.releasable_amount(9_000), U256::zero());
    }

    #[test]
    fn test_revoke_before_cliff_forfeits_everything() {
        let mut schedule = VestingSchedule::new(&params(true)).unwrap();
        assert_eq!(schedule.revoke(1_050).unwrap(), U256::from(1_000_000u64));
        assert_eq!(schedule.release(5_000), Err(TokenomicsError::CliffNotReached(1_100)));
    }

    #[test]
    fn test_non_revocable() {
        let mut schedule = VestingSchedule::new(&params(false)).unwrap();
        assert_eq!(schedule.revoke(1_500), Err(TokenomicsError::NotRevocable));
    }

    #[test]
    fn test_progress_in_bps() {
        let schedule = VestingSchedule::new(&params(false)).unwrap();
        assert_eq!(schedule.vesting_progress(1_000).unwrap(), 0);
        assert_eq!(schedule.vesting_progress(1_250).unwrap(), 2_500);
        assert_eq!(schedule.vesting_progress(2_000).unwrap(), 10_000);
    }

    #[test]
    fn test_wallet_lifecycle() {
        let mut wallet = VestingWallet::new();
        assert_eq!(wallet.release(5_000), Err(TokenomicsError::VestingNotCreated));

        wallet.create_vesting_schedule(&params(true)).unwrap();
        assert_eq!(
            wallet.create_vesting_schedule(&params(true)).unwrap_err(),
            TokenomicsError::VestingAlreadyStarted
        );
        assert_eq!(wallet.vested_amount(1_500).unwrap(), U256::from(500_000u64));
        assert_eq!(wallet.get_vesting_progress(1_500).unwrap(), 5_000);
        assert_eq!(wallet.release(1_500).unwrap(), U256::from(500_000u64));
        assert_eq!(wallet.revoke(1_600).unwrap(), U256::from(400_000u64));
    }
}
