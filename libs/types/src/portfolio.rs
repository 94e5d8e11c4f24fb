//! Balance snapshots and allocation results
//!
//! Everything here is a transient value built fresh for one allocation call.

use crate::common::fixed_point::Ratio;
use crate::common::identifiers::{AssetId, PositionHandle};
use crate::common::wide::U256;
use crate::AllocationError;

/// What the vault holds for one portfolio asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holding {
    /// Plain token balance
    Direct(U256),
    /// Balance of a position-wrapper share token backed by an LP position
    LpPosition { handle: PositionHandle, amount: U256 },
}

impl Holding {
    /// Token balance used for ratio computations
    pub fn amount(&self) -> U256 {
        match self {
            Holding::Direct(amount) | Holding::LpPosition { amount, .. } => *amount,
        }
    }

    pub fn position(&self) -> Option<PositionHandle> {
        match self {
            Holding::Direct(_) => None,
            Holding::LpPosition { handle, .. } => Some(*handle),
        }
    }
}

/// Vault's current holding of one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBalance {
    pub asset_id: AssetId,
    pub holding: Holding,
}

impl AssetBalance {
    pub fn direct(asset_id: impl Into<AssetId>, amount: U256) -> Self {
        Self {
            asset_id: asset_id.into(),
            holding: Holding::Direct(amount),
        }
    }

    pub fn lp_position(asset_id: impl Into<AssetId>, handle: PositionHandle, amount: U256) -> Self {
        Self {
            asset_id: asset_id.into(),
            holding: Holding::LpPosition { handle, amount },
        }
    }

    pub fn amount(&self) -> U256 {
        self.holding.amount()
    }

    pub fn is_lp_position(&self) -> bool {
        self.holding.position().is_some()
    }
}

/// One entry of a deposit offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferedAmount {
    pub asset_id: AssetId,
    pub amount: U256,
}

/// Amounts a user offers, positionally aligned with the vault's asset list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositOffer {
    entries: Vec<OfferedAmount>,
}

impl DepositOffer {
    pub fn new(entries: Vec<OfferedAmount>) -> Self {
        Self { entries }
    }

    /// Pair ids with amounts in order; fails if the lists differ in length
    pub fn from_parts<I>(asset_ids: Vec<I>, amounts: Vec<U256>) -> Result<Self, AllocationError>
    where
        I: Into<AssetId>,
    {
        if asset_ids.len() != amounts.len() {
            return Err(AllocationError::LengthMismatch {
                balances: asset_ids.len(),
                offers: amounts.len(),
            });
        }
        let entries = asset_ids
            .into_iter()
            .zip(amounts)
            .map(|(asset_id, amount)| OfferedAmount {
                asset_id: asset_id.into(),
                amount,
            })
            .collect();
        Ok(Self { entries })
    }

    /// Offer the same ids as `balances` with the given amounts
    pub fn matching(balances: &[AssetBalance], amounts: &[U256]) -> Result<Self, AllocationError> {
        let ids: Vec<AssetId> = balances.iter().map(|b| b.asset_id.clone()).collect();
        Self::from_parts(ids, amounts.to_vec())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OfferedAmount] {
        &self.entries
    }

    pub fn amounts(&self) -> Vec<U256> {
        self.entries.iter().map(|entry| entry.amount).collect()
    }
}

/// Accepted deposit and the ratio the vault grows by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    /// Same length and order as the offer
    pub accepted_amounts: Vec<U256>,
    /// Minimum of `offered / balance` over nonzero balances, or one on first deposit
    pub least_proportion: Ratio,
    /// Asset whose ratio bound the deposit, `None` on first deposit
    pub binding_index: Option<usize>,
}

impl AllocationResult {
    pub fn is_first_deposit(&self) -> bool {
        self.binding_index.is_none()
    }

    /// `least_proportion` as a fixed-point value at `precision`
    pub fn least_proportion_scaled(&self, precision: U256) -> Result<U256, AllocationError> {
        self.least_proportion.scaled(precision)
    }
}

/// Amount paid out for one asset on withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutput {
    Direct {
        amount: U256,
    },
    /// Wrapper shares redeemed and the underlying amounts they are worth
    LpPosition {
        handle: PositionHandle,
        wrapper_shares: U256,
        amount0: U256,
        amount1: U256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetWithdrawal {
    pub asset_id: AssetId,
    pub output: AssetOutput,
}

/// Proportional payout across every held asset, in vault order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalAllocation {
    pub outputs: Vec<AssetWithdrawal>,
}

impl WithdrawalAllocation {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetWithdrawal> {
        self.outputs.iter()
    }

    /// Direct payout amounts in order, `None` for LP entries
    pub fn direct_amounts(&self) -> Vec<Option<U256>> {
        self.outputs
            .iter()
            .map(|withdrawal| match withdrawal.output {
                AssetOutput::Direct { amount } => Some(amount),
                AssetOutput::LpPosition { .. } => None,
            })
            .collect()
    }
}
