//citrate/cli/src/main.rs

use anyhow::Result;
use citrate_tokenomics::{TokenomicsConfig, U256};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;

use commands::curve::CurveSource;
use utils::parse_amount;

#[derive(Parser)]
#[command(name = "citrate-tokenomics")]
#[command(about = "Inspect and simulate Citrate token economics", long_about = None)]
#[command(version)]
struct Cli {
    /// Tokenomics config file (JSON)
    #[arg(short, long, global = true, env = "CITRATE_TOKENOMICS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the spot price and market cap of the configured curve
    Price {
        /// Also price the curve at this supply
        #[arg(long, value_parser = parse_amount)]
        supply: Option<U256>,

        /// Persisted curve state (JSON) instead of a fresh curve
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Quote or execute a purchase
    Buy {
        /// Reserve to deposit (base units, decimal or 0x hex)
        #[arg(value_parser = parse_amount)]
        reserve: U256,

        /// Minimum tokens to accept
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        min_out: U256,

        /// Execute the trade instead of quoting it
        #[arg(long)]
        commit: bool,

        /// Persisted curve state (JSON); updated on commit
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Quote or execute a sale
    Sell {
        /// Tokens to burn (base units, decimal or 0x hex)
        #[arg(value_parser = parse_amount)]
        tokens: U256,

        /// Minimum reserve to accept
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        min_out: U256,

        /// Execute the trade instead of quoting it
        #[arg(long)]
        commit: bool,

        /// Persisted curve state (JSON); updated on commit
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Show the vesting position at a timestamp
    Vesting {
        /// Unix timestamp
        #[arg(long)]
        at: u64,
    },

    /// Show emissions accrued over a time window
    Emission {
        #[arg(long)]
        from: u64,

        #[arg(long)]
        to: u64,
    },

    /// Compute and apply a rebase for a price observation
    Rebase {
        /// Observed price
        #[arg(long, value_parser = parse_amount)]
        price: U256,

        /// Target price
        #[arg(long, value_parser = parse_amount)]
        target: U256,

        /// Unix timestamp of the observation
        #[arg(long)]
        at: u64,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("citrate_tokenomics=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TokenomicsConfig::from_file(path)?,
        None => TokenomicsConfig::default(),
    };

    match cli.command {
        Commands::Price { supply, state } => {
            commands::curve::price(&CurveSource { config: &config, state }, supply)
        }
        Commands::Buy {
            reserve,
            min_out,
            commit,
            state,
        } => commands::curve::buy(
            &CurveSource { config: &config, state },
            reserve,
            min_out,
            commit,
        ),
        Commands::Sell {
            tokens,
            min_out,
            commit,
            state,
        } => commands::curve::sell(
            &CurveSource { config: &config, state },
            tokens,
            min_out,
            commit,
        ),
        Commands::Vesting { at } => commands::schedule::vesting(&config, at),
        Commands::Emission { from, to } => commands::schedule::emission(&config, from, to),
        Commands::Rebase { price, target, at } => {
            commands::schedule::rebase(&config, price, target, at)
        }
    }
}
