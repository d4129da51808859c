//citrate/cli/src/commands/schedule.rs

use anyhow::{ensure, Result};
use citrate_tokenomics::{RebaseAdjustment, TokenomicsConfig, U256};
use serde_json::json;

use super::print_json;

/// Vesting position of the configured schedule at `at`
pub fn vesting(config: &TokenomicsConfig, at: u64) -> Result<()> {
    let wallet = config.build_vesting()?;
    let schedule = wallet.schedule()?;

    print_json(&json!({
        "at": at,
        "total": schedule.total_amount().to_string(),
        "vested": wallet.vested_amount_at(at)?.to_string(),
        "releasable": wallet.releasable_amount(at)?.to_string(),
        "progress_bps": wallet.get_vesting_progress(at)?,
        "cliff_end": schedule.cliff_end(),
        "end_time": schedule.end_time(),
    }))
}

/// Emission accrued between `from` and `to`
pub fn emission(config: &TokenomicsConfig, from: u64, to: u64) -> Result<()> {
    ensure!(from <= to, "--from ({}) must not be after --to ({})", from, to);
    let schedule = config.build_emission()?;

    print_json(&json!({
        "from": from,
        "to": to,
        "epoch": schedule.current_epoch(to),
        "rate_at_from": schedule.emission_rate_at(from)?.to_string(),
        "rate_at_to": schedule.emission_rate_at(to)?.to_string(),
        "pending": schedule.calculate_pending_emissions(from, to)?.to_string(),
    }))
}

/// Proposed and applied rebase for a price observation at `at`
pub fn rebase(config: &TokenomicsConfig, price: U256, target: U256, at: u64) -> Result<()> {
    let mut supply = config.build_dynamic_supply()?;
    let adjustment = supply.calculate_rebase(at, price, target)?;

    let proposal = match adjustment {
        RebaseAdjustment::Expand(delta) => json!({ "expand": delta.to_string() }),
        RebaseAdjustment::Contract(delta) => json!({ "contract": delta.to_string() }),
        RebaseAdjustment::Unchanged => json!("unchanged"),
    };

    let mut output = json!({
        "at": at,
        "due": supply.is_rebase_due(at),
        "next_rebase_time": supply.next_rebase_time(),
        "adjustment": proposal,
    });

    if supply.is_rebase_due(at) {
        let outcome = supply.execute_rebase(at, adjustment)?;
        output["outcome"] = json!({
            "previous_supply": outcome.previous_supply.to_string(),
            "new_supply": outcome.new_supply.to_string(),
            "clamped": outcome.clamped,
            "inflation_bps": supply.current_inflation_rate()?,
            "deviation_bps": supply.inflation_deviation()?,
        });
    }

    print_json(&output)
}
