//! # Portfolio Allocation Engine
//!
//! ## Purpose
//!
//! Deterministic, integer-only accounting for a multi-token portfolio: how much
//! of a user's offered basket a vault accepts, how many shares that mints, and
//! what a share redemption pays out across direct token holdings and wrapped
//! concentrated-liquidity positions.
//!
//! ## Integration Points
//!
//! - **Input Sources**: balance snapshots read by the vault contract, share
//!   supply, user offers and redemption amounts
//! - **Output Destinations**: the vault's settlement layer (token pulls,
//!   refunds, mint/burn), rebalancing calldata builders
//! - **Valuation Boundary**: [`PositionSource`] is the only call out of the
//!   engine; everything else is a pure function of its inputs
//!
//! ## Architecture Role
//!
//! ```text
//! types::fixed_point (mul_div, min_ratio)
//!         │
//!         ▼
//! deposit / withdrawal ──► position::PositionValuationAdapter ──► PositionSource
//!         │
//!         ▼
//! accounting::PortfolioAccountant (fees, initial mint, minimum holding)
//! ```
//!
//! ## Rounding Profile
//!
//! - accepted deposit amounts, minted shares and payouts round down
//! - fee shares round up
//! - a deposit followed by a full withdrawal never returns more than was put in

pub mod accounting;
pub mod deposit;
pub mod layout;
pub mod position;
pub mod withdrawal;

pub use accounting::{DepositQuote, PortfolioAccountant, WithdrawalQuote};
pub use deposit::{compute_deposit_allocation, mint_amount};
pub use layout::{PortfolioToken, UnderlyingLayout};
pub use position::{
    ConcentratedLiquidity, LiquiditySnapshot, NoPositions, PositionBook, PositionSnapshot,
    PositionSource, PositionState, PositionValuationAdapter,
};
pub use withdrawal::{check_redemption, compute_direct_withdrawal, compute_withdrawal_allocation};

/// Fixed-point helpers shared with the type crate
pub mod math {
    pub use types::common::fixed_point::*;
}

pub use types::{
    AllocationError, AllocationResult, AssetBalance, AssetId, AssetOutput, AssetWithdrawal,
    DepositOffer, Holding, PositionHandle, Ratio, WithdrawalAllocation, U256,
};
