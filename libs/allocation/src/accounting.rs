//! Fee-aware deposit and withdrawal quotes
//!
//! Layers the portfolio's protocol parameters over the pure allocation
//! engine: the initial mint for an empty portfolio, entry and exit fees taken
//! in shares, the caller's minimum-mint slippage bound and the minimum holder
//! balance.

use crate::deposit::{compute_deposit_allocation, mint_amount};
use crate::position::{NoPositions, PositionSource, PositionValuationAdapter};
use crate::withdrawal::compute_withdrawal_allocation;
use config::PortfolioConfig;
use tracing::debug;
use types::{
    mul_div_rounding, AllocationError, AllocationResult, AssetBalance, DepositOffer, Ratio,
    Rounding, WithdrawalAllocation, TOTAL_WEIGHT_BPS, U256,
};

/// Outcome of a deposit before any token moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositQuote {
    pub allocation: AllocationResult,
    /// `least_proportion` at the configured fixed-point scale
    pub least_proportion_scaled: U256,
    /// Shares the deposit is worth before fees
    pub gross_mint: U256,
    /// Entry fee, rounded up
    pub fee_shares: U256,
    /// Shares credited to the depositor
    pub user_mint: U256,
}

/// Outcome of a withdrawal before any token moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalQuote {
    /// Shares burned from the holder
    pub redeemed: U256,
    /// Exit fee, rounded up
    pub fee_shares: U256,
    /// Shares actually paid out in assets
    pub net_redeemed: U256,
    /// Holder balance after the burn
    pub remaining_balance: U256,
    pub allocation: WithdrawalAllocation,
}

/// Deposit/withdrawal accountant for one portfolio's parameters
#[derive(Debug, Clone)]
pub struct PortfolioAccountant {
    config: PortfolioConfig,
}

impl PortfolioAccountant {
    pub fn new(config: PortfolioConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Quote a multi-token deposit
    ///
    /// An empty portfolio (`total_supply == 0`) accepts the offer as-is and
    /// mints the configured initial amount.
    pub fn quote_deposit(
        &self,
        balances: &[AssetBalance],
        offer: &DepositOffer,
        total_supply: U256,
        holder_balance: U256,
        min_mint_amount: U256,
    ) -> Result<DepositQuote, AllocationError> {
        let (allocation, gross_mint) = if total_supply.is_zero() {
            if balances.is_empty() {
                return Err(AllocationError::EmptyInput);
            }
            if balances.len() != offer.len() {
                return Err(AllocationError::LengthMismatch {
                    balances: balances.len(),
                    offers: offer.len(),
                });
            }
            let allocation = AllocationResult {
                accepted_amounts: offer.amounts(),
                least_proportion: Ratio::ONE,
                binding_index: None,
            };
            (allocation, self.config.supply.initial_portfolio_amount)
        } else {
            let allocation = compute_deposit_allocation(balances, offer)?;
            let gross_mint = mint_amount(&allocation.least_proportion, total_supply)?;
            (allocation, gross_mint)
        };

        let fee_shares = self.fee(gross_mint, self.config.fees.entry_fee_bps)?;
        let user_mint = gross_mint - fee_shares;
        if user_mint.is_zero() {
            return Err(AllocationError::ZeroMint {
                gross: gross_mint,
                fee: fee_shares,
            });
        }

        if user_mint < min_mint_amount {
            return Err(AllocationError::SlippageExceeded {
                expected_min: min_mint_amount,
                actual: user_mint,
            });
        }

        let balance_after = holder_balance
            .checked_add(user_mint)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        self.check_holding(balance_after)?;

        let least_proportion_scaled = allocation
            .least_proportion
            .scaled(self.config.precision.least_proportion_scale)?;

        debug!(
            gross = %gross_mint,
            fee = %fee_shares,
            user = %user_mint,
            least_proportion = %least_proportion_scaled,
            "deposit quoted"
        );

        Ok(DepositQuote {
            allocation,
            least_proportion_scaled,
            gross_mint,
            fee_shares,
            user_mint,
        })
    }

    /// Quote a multi-token withdrawal, valuing LP holdings through `adapter`
    pub fn quote_withdrawal<S: PositionSource>(
        &self,
        balances: &[AssetBalance],
        redeem_amount: U256,
        total_supply: U256,
        holder_balance: U256,
        adapter: &PositionValuationAdapter<S>,
    ) -> Result<WithdrawalQuote, AllocationError> {
        if redeem_amount.is_zero() || redeem_amount > holder_balance {
            return Err(AllocationError::InsufficientSupply {
                requested: redeem_amount,
                available: holder_balance,
            });
        }

        let remaining_balance = holder_balance - redeem_amount;
        if !remaining_balance.is_zero() {
            self.check_holding(remaining_balance)?;
        }

        let fee_shares = self.fee(redeem_amount, self.config.fees.exit_fee_bps)?;
        let net_redeemed = redeem_amount - fee_shares;
        if net_redeemed.is_zero() {
            return Err(AllocationError::FeeExceedsRedemption {
                redeemed: redeem_amount,
                fee: fee_shares,
            });
        }
        let allocation =
            compute_withdrawal_allocation(balances, net_redeemed, total_supply, adapter)?;

        debug!(
            redeemed = %redeem_amount,
            fee = %fee_shares,
            remaining = %remaining_balance,
            "withdrawal quoted"
        );

        Ok(WithdrawalQuote {
            redeemed: redeem_amount,
            fee_shares,
            net_redeemed,
            remaining_balance,
            allocation,
        })
    }

    /// Withdrawal quote for portfolios without LP holdings
    pub fn quote_direct_withdrawal(
        &self,
        balances: &[AssetBalance],
        redeem_amount: U256,
        total_supply: U256,
        holder_balance: U256,
    ) -> Result<WithdrawalQuote, AllocationError> {
        self.quote_withdrawal(
            balances,
            redeem_amount,
            total_supply,
            holder_balance,
            &PositionValuationAdapter::new(NoPositions),
        )
    }

    fn fee(&self, shares: U256, fee_bps: u32) -> Result<U256, AllocationError> {
        mul_div_rounding(
            shares,
            U256::from(fee_bps),
            U256::from(TOTAL_WEIGHT_BPS),
            Rounding::Up,
        )
    }

    fn check_holding(&self, balance: U256) -> Result<(), AllocationError> {
        let minimum = self.config.supply.min_portfolio_token_holding;
        if balance < minimum {
            return Err(AllocationError::BelowMinimumHolding { balance, minimum });
        }
        Ok(())
    }
}
