//! Proportional multi-asset withdrawal allocation
//!
//! Every asset pays out `floor(balance * redeem / supply)`. Flooring leaves
//! dust in the vault so a deposit followed by a full withdrawal never returns
//! more than was put in.

use crate::position::{NoPositions, PositionSource, PositionValuationAdapter};
use tracing::{debug, trace};
use types::{
    mul_div, AllocationError, AssetBalance, AssetOutput, AssetWithdrawal, Holding,
    WithdrawalAllocation, U256,
};

/// Payout for redeeming `redeem_amount` of `total_supply` shares
///
/// Direct holdings pay out token amounts. LP holdings transfer the floored
/// share of the vault's wrapper tokens and report the underlying token0/token1
/// amounts behind the exact `redeem / supply` fraction of that holding, valued
/// through `adapter` with a single floor.
pub fn compute_withdrawal_allocation<S: PositionSource>(
    balances: &[AssetBalance],
    redeem_amount: U256,
    total_supply: U256,
    adapter: &PositionValuationAdapter<S>,
) -> Result<WithdrawalAllocation, AllocationError> {
    check_redemption(redeem_amount, total_supply)?;
    if balances.is_empty() {
        return Err(AllocationError::EmptyInput);
    }

    let mut outputs = Vec::with_capacity(balances.len());
    for balance in balances {
        let output = match balance.holding {
            Holding::Direct(amount) => AssetOutput::Direct {
                amount: mul_div(amount, redeem_amount, total_supply)?,
            },
            Holding::LpPosition { handle, amount } => {
                let wrapper_shares = mul_div(amount, redeem_amount, total_supply)?;
                let (amount0, amount1) =
                    adapter.value_wrapper_fraction(handle, amount, redeem_amount, total_supply)?;
                AssetOutput::LpPosition {
                    handle,
                    wrapper_shares,
                    amount0,
                    amount1,
                }
            }
        };
        trace!(asset = %balance.asset_id, ?output, "asset payout");
        outputs.push(AssetWithdrawal {
            asset_id: balance.asset_id.clone(),
            output,
        });
    }

    debug!(
        assets = outputs.len(),
        redeem = %redeem_amount,
        supply = %total_supply,
        "withdrawal allocation computed"
    );
    Ok(WithdrawalAllocation { outputs })
}

/// Withdrawal over plain token holdings only
///
/// An LP holding in `balances` fails with `PositionNotFound`.
pub fn compute_direct_withdrawal(
    balances: &[AssetBalance],
    redeem_amount: U256,
    total_supply: U256,
) -> Result<WithdrawalAllocation, AllocationError> {
    compute_withdrawal_allocation(
        balances,
        redeem_amount,
        total_supply,
        &PositionValuationAdapter::new(NoPositions),
    )
}

/// `0 < redeem_amount <= total_supply`, rejected rather than clamped
pub fn check_redemption(redeem_amount: U256, total_supply: U256) -> Result<(), AllocationError> {
    if total_supply.is_zero() {
        return Err(AllocationError::ZeroSupply);
    }
    if redeem_amount.is_zero() || redeem_amount > total_supply {
        return Err(AllocationError::InsufficientSupply {
            requested: redeem_amount,
            available: total_supply,
        });
    }
    Ok(())
}
