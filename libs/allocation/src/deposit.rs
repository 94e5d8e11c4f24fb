//! Ratio-preserving multi-asset deposit allocation
//!
//! A deposit must grow every held asset by the same fraction, otherwise the
//! shares minted would not represent a single consistent change of the vault.
//! The asset the user under-supplied the most binds; every other asset is
//! capped down to that fraction. Refunding the excess is the caller's concern.

use tracing::{debug, trace};
use types::{min_ratio, AllocationError, AllocationResult, AssetBalance, DepositOffer, Ratio, U256};

/// Largest deposit that keeps the vault's existing asset ratio
///
/// - all balances zero (first deposit): the offer is accepted unchanged and
///   `least_proportion` is one
/// - otherwise `least_proportion = min(offer[i] / balance[i])` over nonzero
///   balances and `accepted[i] = floor(balance[i] * least_proportion)`; assets
///   the vault does not hold yet are accepted in full
pub fn compute_deposit_allocation(
    balances: &[AssetBalance],
    offer: &DepositOffer,
) -> Result<AllocationResult, AllocationError> {
    if balances.is_empty() {
        return Err(AllocationError::EmptyInput);
    }
    if balances.len() != offer.len() {
        return Err(AllocationError::LengthMismatch {
            balances: balances.len(),
            offers: offer.len(),
        });
    }

    let held: Vec<U256> = balances.iter().map(AssetBalance::amount).collect();
    let offered = offer.amounts();

    if held.iter().all(U256::is_zero) {
        debug!(assets = balances.len(), "first deposit, accepting offer as-is");
        return Ok(AllocationResult {
            accepted_amounts: offered,
            least_proportion: Ratio::ONE,
            binding_index: None,
        });
    }

    let (binding_index, least_proportion) = min_ratio(&offered, &held)?;

    let mut accepted_amounts = Vec::with_capacity(held.len());
    for (index, (balance, offered_amount)) in held.iter().zip(&offered).enumerate() {
        let accepted = if balance.is_zero() {
            *offered_amount
        } else {
            least_proportion.apply(*balance)?
        };
        trace!(
            index,
            asset = %balances[index].asset_id,
            balance = %balance,
            offered = %offered_amount,
            accepted = %accepted,
            "asset allocation"
        );
        accepted_amounts.push(accepted);
    }

    debug!(
        binding_index,
        binding_asset = %balances[binding_index].asset_id,
        least_proportion = ?least_proportion.to_decimal(),
        "deposit allocation computed"
    );

    Ok(AllocationResult {
        accepted_amounts,
        least_proportion,
        binding_index: Some(binding_index),
    })
}

/// Shares to mint for a deposit that grew the vault by `least_proportion`
///
/// `floor(total_supply * least_proportion)`. The zero-supply case is decided
/// by the configured initial mint, see [`crate::PortfolioAccountant`].
pub fn mint_amount(least_proportion: &Ratio, total_supply: U256) -> Result<U256, AllocationError> {
    least_proportion.apply(total_supply)
}
