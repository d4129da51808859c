// citrate/core/tokenomics/src/lib.rs

//! Citrate Tokenomics
//!
//! Supply and price primitives for the Citrate token economy: bonding-curve
//! issuance and redemption, vesting, elastic supply rebases and decaying
//! emissions. Every controller is a plain value owned by its caller; the
//! embedding system serializes access and persists state.

pub mod bancor;
pub mod bonding_curve;
pub mod config;
pub mod curve;
pub mod dynamic_supply;
pub mod emission;
pub mod error;
pub mod integration;
pub mod math;
pub mod vesting;

pub use bonding_curve::{BondingCurve, CurveParams, TradeQuote};
pub use config::TokenomicsConfig;
pub use curve::{CurveKind, CurveShape};
pub use dynamic_supply::{DynamicSupply, DynamicSupplyParams, RebaseAdjustment, RebaseOutcome};
pub use emission::{EmissionParams, EmissionSchedule};
pub use error::{Result, TokenomicsError};
pub use integration::QuadratureConfig;
pub use math::{BPS, PRECISION};
pub use primitive_types::U256;
pub use vesting::{VestingParams, VestingSchedule, VestingWallet};
