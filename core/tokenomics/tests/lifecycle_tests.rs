// Multi-step flows across the vesting, supply and emission controllers

use citrate_tokenomics::*;

const DAY: u64 = 86_400;

fn team_vesting(revocable: bool) -> VestingParams {
    VestingParams {
        total_amount: U256::from(4_800_000u64),
        start_time: 1_700_000_000,
        cliff_duration: 90 * DAY,
        vesting_duration: 480 * DAY,
        revocable,
    }
}

fn elastic_supply() -> DynamicSupply {
    DynamicSupply::initialize(&DynamicSupplyParams {
        base_supply: U256::from(10_000_000u64),
        max_supply: U256::from(12_000_000u64),
        min_supply: U256::from(9_000_000u64),
        target_inflation_bps: 300,
        rebase_interval: DAY,
        damping_factor_bps: 2_000,
        start_time: 0,
    })
    .unwrap()
}

fn halving_emission() -> EmissionSchedule {
    EmissionSchedule::initialize(&EmissionParams {
        initial_rate: U256::from(1_024u64),
        decay_rate_bps: 5_000,
        epoch_duration: 1_000,
        start_time: 0,
        min_rate: U256::from(16u64),
        max_total_emission: U256::zero(),
    })
    .unwrap()
}

#[cfg(test)]
mod vesting_tests {
    use super::*;

    #[test_log::test]
    fn test_monthly_releases_sum_to_total() {
        let params = team_vesting(false);
        let mut wallet = VestingWallet::new();
        wallet.create_vesting_schedule(&params).unwrap();

        let mut released = U256::zero();
        let mut t = params.start_time;
        while t <= params.start_time + params.vesting_duration + 30 * DAY {
            if let Ok(amount) = wallet.release(t) {
                released += amount;
            }
            t += 30 * DAY;
        }

        assert_eq!(released, params.total_amount);
        assert_eq!(wallet.releasable_amount(t).unwrap(), U256::zero());
        assert_eq!(wallet.get_vesting_progress(t).unwrap(), 10_000);
    }

    #[test]
    fn test_cliff_unlocks_accrued_share() {
        let params = team_vesting(false);
        let mut wallet = VestingWallet::new();
        wallet.create_vesting_schedule(&params).unwrap();

        let cliff = params.start_time + params.cliff_duration;
        assert_eq!(
            wallet.release(cliff - 1),
            Err(TokenomicsError::CliffNotReached(cliff))
        );
        // 90 of 480 days
        assert_eq!(wallet.release(cliff).unwrap(), U256::from(900_000u64));
    }

    #[test]
    fn test_revocation_mid_schedule() {
        let params = team_vesting(true);
        let mut wallet = VestingWallet::new();
        wallet.create_vesting_schedule(&params).unwrap();

        let halfway = params.start_time + 240 * DAY;
        wallet.release(params.start_time + 120 * DAY).unwrap();
        let forfeited = wallet.revoke(halfway).unwrap();
        assert_eq!(forfeited, U256::from(2_400_000u64));

        // the remainder up to the revocation point is still claimable
        let later = params.start_time + 400 * DAY;
        assert_eq!(wallet.release(later).unwrap(), U256::from(1_200_000u64));
        assert_eq!(wallet.release(later), Err(TokenomicsError::NothingToVest));
        assert_eq!(wallet.get_vesting_progress(later).unwrap(), 5_000);
        assert!(matches!(
            wallet.revoke(later),
            Err(TokenomicsError::AlreadyRevoked(_))
        ));
    }
}

#[cfg(test)]
mod rebase_tests {
    use super::*;

    #[test_log::test]
    fn test_repeated_expansion_hits_ceiling() {
        let mut supply = elastic_supply();
        let mut now = DAY;
        let mut hit_ceiling = false;

        for _ in 0..50 {
            let adjustment = supply
                .calculate_rebase(now, U256::from(150), U256::from(100))
                .unwrap();
            let outcome = supply.execute_rebase(now, adjustment).unwrap();
            assert!(outcome.new_supply >= outcome.previous_supply);
            hit_ceiling |= outcome.clamped;
            now += DAY;
        }

        assert!(hit_ceiling);
        assert_eq!(supply.current_supply(), U256::from(12_000_000u64));
        assert_eq!(supply.current_inflation_rate().unwrap(), 2_000);
    }

    #[test]
    fn test_contraction_then_recovery() {
        let mut supply = elastic_supply();

        // 50% below peg, damped to 10%, floored at 9M
        let adjustment = supply
            .calculate_rebase(DAY, U256::from(50), U256::from(100))
            .unwrap();
        assert_eq!(adjustment, RebaseAdjustment::Contract(U256::from(1_000_000u64)));
        let outcome = supply.execute_rebase(DAY, adjustment).unwrap();
        assert_eq!(outcome.new_supply, U256::from(9_000_000u64));
        assert!(!outcome.clamped);

        // the next rebase is a full interval away
        assert!(!supply.is_rebase_due(DAY + 1));
        assert_eq!(supply.next_rebase_time(), 2 * DAY);
        assert!(matches!(
            supply.execute_rebase(DAY + 1, RebaseAdjustment::Unchanged),
            Err(TokenomicsError::RebaseCooldownActive(_))
        ));

        // at peg nothing changes but the cooldown restarts
        let adjustment = supply
            .calculate_rebase(2 * DAY, U256::from(100), U256::from(100))
            .unwrap();
        assert_eq!(adjustment, RebaseAdjustment::Unchanged);
        let outcome = supply.execute_rebase(2 * DAY, adjustment).unwrap();
        assert_eq!(outcome.new_supply, outcome.previous_supply);
        assert_eq!(supply.last_rebase_time(), 2 * DAY);
        assert_eq!(supply.current_inflation_rate().unwrap(), -1_000);
        assert_eq!(supply.inflation_deviation().unwrap(), -1_300);
    }
}

#[cfg(test)]
mod emission_tests {
    use super::*;

    #[test]
    fn test_rate_halves_down_to_floor() {
        let schedule = halving_emission();
        let expected = [1_024u64, 512, 256, 128, 64, 32, 16, 16, 16];
        for (epoch, rate) in expected.iter().enumerate() {
            assert_eq!(
                schedule.get_current_emission_rate(epoch as u64 * 1_000).unwrap(),
                U256::from(*rate),
                "epoch {}",
                epoch
            );
        }
    }

    #[test_log::test]
    fn test_periodic_claims_accumulate() {
        let mut schedule = halving_emission();
        let mut claimed = U256::zero();
        for now in (500..=3_000).step_by(500) {
            claimed += schedule.claim_emissions(now).unwrap();
        }
        assert_eq!(schedule.total_emitted(), claimed);
        assert_eq!(schedule.last_claim_time(), 3_000);
        // epoch 0 at full rate: first claim covers 500s at 1024
        assert!(claimed > U256::from(1_024u64 * 500));
        assert_eq!(schedule.remaining_emission(), None);
    }

    #[test]
    fn test_capped_emission_stops() {
        let mut schedule = EmissionSchedule::initialize(&EmissionParams {
            initial_rate: U256::from(100u64),
            decay_rate_bps: 0,
            epoch_duration: 10,
            start_time: 0,
            min_rate: U256::zero(),
            max_total_emission: U256::from(1_000u64),
        })
        .unwrap();

        assert_eq!(schedule.claim_emissions(6).unwrap(), U256::from(600u64));
        assert_eq!(schedule.claim_emissions(20).unwrap(), U256::from(400u64));
        assert_eq!(schedule.claim_emissions(100).unwrap(), U256::zero());
        assert_eq!(schedule.total_emitted(), U256::from(1_000u64));
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_config_builds_every_controller() {
        let json = r#"{
            "quadrature": { "simpson_steps": 50 },
            "curve": {
                "type": "linear",
                "slope": "0x1bc16d674ec80000",
                "intercept": "0x0"
            },
            "vesting": {
                "total_amount": "0x3e8",
                "start_time": 0,
                "cliff_duration": 10,
                "vesting_duration": 100
            },
            "dynamic_supply": {
                "base_supply": "0x3e8",
                "max_supply": "0x7d0",
                "min_supply": "0x1f4",
                "target_inflation_bps": 200,
                "rebase_interval": 60,
                "damping_factor_bps": 1000
            },
            "emission": {
                "initial_rate": "0x64",
                "decay_rate_bps": 100,
                "epoch_duration": 10,
                "start_time": 0,
                "min_rate": "0x1"
            }
        }"#;
        let config = TokenomicsConfig::from_json(json).unwrap();
        assert_eq!(config.quadrature.simpson_steps, 50);
        assert_eq!(config.quadrature.search_iterations, 256);

        let mut curve = config.build_curve().unwrap();
        assert_eq!(curve.calculate_buy_cost(U256::from(10)).unwrap(), U256::from(100));
        curve.execute_buy(U256::from(100), U256::zero()).unwrap();

        let wallet = config.build_vesting().unwrap();
        assert_eq!(wallet.vested_amount(50).unwrap(), U256::from(500u64));

        let supply = config.build_dynamic_supply().unwrap();
        assert_eq!(supply.current_supply(), U256::from(1_000u64));

        let emission = config.build_emission().unwrap();
        assert_eq!(emission.get_current_emission_rate(0).unwrap(), U256::from(100u64));
    }
}
