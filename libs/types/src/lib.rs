//! # Portfolio Types
//!
//! Shared type system for proportional multi-asset portfolio accounting.
//!
//! ## Design Philosophy
//!
//! - **No Floating Point**: every amount is an unsigned 256-bit integer in the
//!   asset's smallest unit, every ratio is an explicit numerator/denominator pair
//! - **Overflow Safe**: products are formed in 512-bit intermediates and narrowed
//!   back with a checked conversion
//! - **Snapshot Inputs**: balances are plain ordered lists supplied by the caller,
//!   never cached or mutated here
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{mul_div, AssetBalance, Ratio, U256};
//!
//! let half = Ratio::new(U256::from(50u64), U256::from(100u64)).unwrap();
//! assert_eq!(half.apply(U256::from(200u64)).unwrap(), U256::from(100u64));
//!
//! let balance = AssetBalance::direct("USDC", U256::from(1_000_000u64));
//! assert_eq!(
//!     mul_div(balance.amount(), U256::from(1u64), U256::from(4u64)).unwrap(),
//!     U256::from(250_000u64)
//! );
//! ```

pub mod common;
pub mod portfolio;

pub use common::errors::{AllocationError, SourceError};
pub use common::fixed_point::{
    min_ratio, mul_div, mul_div_fraction, mul_div_rounding, percentage, Ratio, Rounding,
    PRECISION_1E18, TOTAL_WEIGHT_BPS,
};
pub use common::identifiers::{AssetId, PositionHandle};
pub use common::wide::{U256, U512, U768};
pub use portfolio::{
    AllocationResult, AssetBalance, AssetOutput, AssetWithdrawal, DepositOffer, Holding,
    OfferedAmount, WithdrawalAllocation,
};

/// Result alias for allocation operations
pub type Result<T> = std::result::Result<T, AllocationError>;
