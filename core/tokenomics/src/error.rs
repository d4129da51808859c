// citrate/core/tokenomics/src/error.rs

use primitive_types::U256;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenomicsError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenomicsError {
    // Configuration
    #[error("Invalid supply")]
    InvalidSupply,

    #[error("Invalid reserve")]
    InvalidReserve,

    #[error("Invalid slope")]
    InvalidSlope,

    #[error("Invalid exponent: {0} (expected 1..=5)")]
    InvalidExponent(u32),

    #[error("Invalid reserve ratio: {0} bps (expected 1..=10000)")]
    InvalidReserveRatio(u32),

    #[error("Invalid curve type: {0}")]
    InvalidCurveType(String),

    #[error("Invalid vesting schedule: {0}")]
    InvalidVestingSchedule(&'static str),

    #[error("Invalid quadrature settings: {0}")]
    InvalidQuadrature(&'static str),

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Invalid emission schedule: {0}")]
    InvalidEmissionSchedule(&'static str),

    #[error("Invalid rebase settings: {0}")]
    InvalidRebaseConfig(&'static str),

    #[error("Amount must be non-zero")]
    ZeroAmount,

    // Numeric range
    #[error("Overflow protection triggered in {0}")]
    OverflowProtection(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Argument outside the domain of {0}")]
    MathDomain(&'static str),

    // Economic
    #[error("Slippage exceeded: expected at least {expected}, got {actual}")]
    SlippageExceeded { expected: U256, actual: U256 },

    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: U256, available: U256 },

    #[error("Insufficient tokens: requested {requested}, supply {supply}")]
    InsufficientTokens { requested: U256, supply: U256 },

    #[error("Reserve deposit too small to mint a single unit")]
    InsufficientReserve,

    // Lifecycle
    #[error("Curve not initialized")]
    CurveNotInitialized,

    #[error("Curve already initialized")]
    CurveAlreadyInitialized,

    #[error("Vesting schedule already started")]
    VestingAlreadyStarted,

    #[error("Vesting schedule not created")]
    VestingNotCreated,

    #[error("Nothing to vest")]
    NothingToVest,

    #[error("Cliff not reached: vesting starts at {0}")]
    CliffNotReached(u64),

    #[error("Vesting schedule is not revocable")]
    NotRevocable,

    #[error("Vesting schedule already revoked at {0}")]
    AlreadyRevoked(u64),

    #[error("Rebase cooldown active until {0}")]
    RebaseCooldownActive(u64),
}
