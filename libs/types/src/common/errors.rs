//! Error types for proportional allocation and position valuation
//!
//! Every variant is terminal for the call that raised it. Callers decide
//! whether to retry with a fresh balance snapshot or abort.

use super::identifiers::PositionHandle;
use super::wide::U256;
use thiserror::Error;

/// Errors raised by the allocation engine and the valuation adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Balance list and offer list are not positionally aligned
    #[error("Length mismatch: {balances} vault balances vs {offers} offered amounts")]
    LengthMismatch { balances: usize, offers: usize },

    /// No assets were supplied
    #[error("Empty input: at least one asset is required")]
    EmptyInput,

    /// Every denominator was zero so no asset bounds the ratio
    #[error("No constraining asset: every vault balance is zero")]
    NoConstrainingAsset,

    /// Division by zero or a result wider than 256 bits
    #[error("Arithmetic overflow: result not representable in 256 bits")]
    ArithmeticOverflow,

    /// Share supply is zero so no proportional withdrawal exists
    #[error("Zero supply: no portfolio shares outstanding")]
    ZeroSupply,

    /// Redemption outside `(0, available]`
    #[error("Insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply { requested: U256, available: U256 },

    /// Valuation source has no position for the handle
    #[error("Position {0} not found")]
    PositionNotFound(PositionHandle),

    /// Valuation source failed or returned inconsistent state
    #[error("Stale valuation for position {handle}: {reason}")]
    StaleValuation {
        handle: PositionHandle,
        reason: String,
    },

    /// Minted shares fell below the caller's minimum
    #[error("Slippage exceeded: minted {actual}, expected at least {expected_min}")]
    SlippageExceeded { expected_min: U256, actual: U256 },

    /// Deposit would take tokens without crediting any shares
    #[error("Zero mint: deposit worth {gross} shares leaves nothing after fee {fee}")]
    ZeroMint { gross: U256, fee: U256 },

    /// Exit fee consumes every share being redeemed
    #[error("Fee exceeds redemption: exit fee {fee} on {redeemed} redeemed shares")]
    FeeExceedsRedemption { redeemed: U256, fee: U256 },

    /// Resulting holder balance is nonzero but under the configured minimum
    #[error("Below minimum holding: balance {balance} under minimum {minimum}")]
    BelowMinimumHolding { balance: U256, minimum: U256 },
}

/// Failures reported by an external position valuation source
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("position not found")]
    NotFound,

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl AllocationError {
    /// Map a source failure onto the allocation taxonomy for `handle`
    pub fn from_source(handle: PositionHandle, err: SourceError) -> Self {
        match err {
            SourceError::NotFound => AllocationError::PositionNotFound(handle),
            SourceError::Unavailable(reason) => AllocationError::StaleValuation { handle, reason },
        }
    }
}
