//citrate/cli/src/commands/curve.rs

use anyhow::{Context, Result};
use citrate_tokenomics::{BondingCurve, TokenomicsConfig, TradeQuote, U256};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::print_json;

/// Where a command reads its curve from
pub struct CurveSource<'a> {
    pub config: &'a TokenomicsConfig,
    /// Persisted curve state; takes precedence over the configured curve
    pub state: Option<PathBuf>,
}

impl CurveSource<'_> {
    fn load(&self) -> Result<BondingCurve> {
        match &self.state {
            Some(path) => load_state(path),
            None => self.config.build_curve(),
        }
    }
}

fn load_state(path: &Path) -> Result<BondingCurve> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read curve state {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid curve state in {:?}", path))
}

fn save_state(path: &Path, curve: &BondingCurve) -> Result<()> {
    let content = serde_json::to_string_pretty(curve)?;
    fs::write(path, content).with_context(|| format!("Failed to write curve state {:?}", path))
}

fn curve_summary(curve: &BondingCurve) -> Result<serde_json::Value> {
    Ok(json!({
        "kind": curve.kind()?.to_string(),
        "supply": curve.current_supply().to_string(),
        "reserve": curve.reserve_balance().to_string(),
        "spot_price": curve.get_spot_price()?.to_string(),
        "market_cap": curve.market_cap()?.to_string(),
    }))
}

fn quote_json(quote: &TradeQuote) -> serde_json::Value {
    json!({
        "amount_in": quote.amount_in.to_string(),
        "amount_out": quote.amount_out.to_string(),
        "spot_price_before": quote.spot_price_before.to_string(),
        "spot_price_after": quote.spot_price_after.to_string(),
        "average_price": quote.average_price.to_string(),
    })
}

pub fn price(source: &CurveSource, supply: Option<U256>) -> Result<()> {
    let curve = source.load()?;
    let mut output = curve_summary(&curve)?;
    if let Some(supply) = supply {
        output["price_at_supply"] = json!({
            "supply": supply.to_string(),
            "price": curve.get_price_at_supply(supply)?.to_string(),
        });
    }
    print_json(&output)
}

pub fn buy(source: &CurveSource, reserve_in: U256, min_tokens_out: U256, commit: bool) -> Result<()> {
    let mut curve = source.load()?;
    let quote = curve.quote_buy(reserve_in)?;

    if !commit {
        return print_json(&json!({ "quote": quote_json(&quote) }));
    }

    let minted = curve.execute_buy(reserve_in, min_tokens_out)?;
    info!(%reserve_in, %minted, "Buy committed");
    persist(source, &curve)?;
    print_json(&json!({
        "quote": quote_json(&quote),
        "minted": minted.to_string(),
        "curve": curve_summary(&curve)?,
    }))
}

pub fn sell(source: &CurveSource, tokens_in: U256, min_reserve_out: U256, commit: bool) -> Result<()> {
    let mut curve = source.load()?;
    let quote = curve.quote_sell(tokens_in)?;

    if !commit {
        return print_json(&json!({ "quote": quote_json(&quote) }));
    }

    let refunded = curve.execute_sell(tokens_in, min_reserve_out)?;
    info!(%tokens_in, %refunded, "Sell committed");
    persist(source, &curve)?;
    print_json(&json!({
        "quote": quote_json(&quote),
        "refunded": refunded.to_string(),
        "curve": curve_summary(&curve)?,
    }))
}

fn persist(source: &CurveSource, curve: &BondingCurve) -> Result<()> {
    match &source.state {
        Some(path) => {
            save_state(path, curve)?;
            eprintln!("{} {:?}", "Curve state saved to".green(), path);
        }
        None => {
            eprintln!(
                "{}",
                "No --state file given; committed trade was not persisted".yellow()
            );
        }
    }
    Ok(())
}
