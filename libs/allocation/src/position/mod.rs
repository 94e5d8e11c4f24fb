//! Valuation of fractional shares of concentrated-liquidity positions
//!
//! A position wrapper token represents a pro-rata claim on one LP position.
//! Its value moves continuously with price and accrued fees, so every
//! valuation re-queries the external source; nothing is cached here.

pub mod book;
pub mod liquidity;

use std::sync::Arc;
use tracing::{trace, warn};
use types::{
    mul_div, mul_div_fraction, AllocationError, AssetId, PositionHandle, SourceError, U256,
};

pub use book::{LiquiditySnapshot, PositionBook, PositionSnapshot};
pub use liquidity::ConcentratedLiquidity;

/// Current state of one wrapped LP position as reported by the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    pub token0: AssetId,
    pub token1: AssetId,
    /// Total underlying token0 attributable to the position, fees included
    pub reserve0: U256,
    /// Total underlying token1 attributable to the position, fees included
    pub reserve1: U256,
    /// Outstanding wrapper share tokens
    pub total_supply: U256,
}

impl PositionState {
    /// Reason the state cannot be valued, if any
    fn inconsistency(&self) -> Option<&'static str> {
        if self.total_supply.is_zero() && !(self.reserve0.is_zero() && self.reserve1.is_zero()) {
            return Some("reserves present without wrapper supply");
        }
        None
    }
}

/// External oracle over pool liquidity and sqrt-price state
pub trait PositionSource {
    fn position_state(&self, handle: PositionHandle) -> Result<PositionState, SourceError>;
}

impl<S: PositionSource + ?Sized> PositionSource for &S {
    fn position_state(&self, handle: PositionHandle) -> Result<PositionState, SourceError> {
        (**self).position_state(handle)
    }
}

impl<S: PositionSource + ?Sized> PositionSource for Arc<S> {
    fn position_state(&self, handle: PositionHandle) -> Result<PositionState, SourceError> {
        (**self).position_state(handle)
    }
}

/// Source for vaults without LP positions; every lookup is `NotFound`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositions;

impl PositionSource for NoPositions {
    fn position_state(&self, _handle: PositionHandle) -> Result<PositionState, SourceError> {
        Err(SourceError::NotFound)
    }
}

/// Converts a fraction of a position into underlying token amounts
#[derive(Debug, Clone)]
pub struct PositionValuationAdapter<S> {
    source: S,
}

impl<S: PositionSource> PositionValuationAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Floor-rounded `fraction` of the position's current reserves
    ///
    /// Failures from the source are surfaced as `PositionNotFound` or
    /// `StaleValuation` and never retried here.
    pub fn value_share(
        &self,
        handle: PositionHandle,
        fraction_numerator: U256,
        fraction_denominator: U256,
    ) -> Result<(U256, U256), AllocationError> {
        check_fraction(fraction_numerator, fraction_denominator)?;
        let state = self.fetch(handle)?;
        share_of(&state, fraction_numerator, fraction_denominator)
    }

    /// Underlying amounts behind `wrapper_shares` wrapper tokens
    ///
    /// Reads the wrapper supply and reserves from one snapshot.
    pub fn value_wrapper_shares(
        &self,
        handle: PositionHandle,
        wrapper_shares: U256,
    ) -> Result<(U256, U256), AllocationError> {
        self.value_wrapper_fraction(handle, wrapper_shares, U256::one(), U256::one())
    }

    /// Underlying amounts behind `fraction` of a `wrapper_balance` holding
    ///
    /// Values `wrapper_balance * num / (wrapper_supply * den)` of the reserves
    /// with a single floor, so a holding that does not split into whole
    /// wrapper shares is still paid its exact proportional value.
    pub fn value_wrapper_fraction(
        &self,
        handle: PositionHandle,
        wrapper_balance: U256,
        fraction_numerator: U256,
        fraction_denominator: U256,
    ) -> Result<(U256, U256), AllocationError> {
        check_fraction(fraction_numerator, fraction_denominator)?;
        let state = self.fetch(handle)?;
        if wrapper_balance.is_zero() || fraction_numerator.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }
        if state.total_supply.is_zero() {
            warn!(%handle, %wrapper_balance, "wrapper shares held but wrapper supply is zero");
            return Err(AllocationError::StaleValuation {
                handle,
                reason: "wrapper supply is zero".to_string(),
            });
        }
        if wrapper_balance > state.total_supply {
            warn!(%handle, %wrapper_balance, supply = %state.total_supply, "wrapper shares exceed supply");
            return Err(AllocationError::StaleValuation {
                handle,
                reason: format!(
                    "wrapper shares {} exceed supply {}",
                    wrapper_balance, state.total_supply
                ),
            });
        }

        let numerator = wrapper_balance.widen() * fraction_numerator.widen();
        let denominator = state.total_supply.widen() * fraction_denominator.widen();
        let amount0 = mul_div_fraction(state.reserve0, numerator, denominator)?;
        let amount1 = mul_div_fraction(state.reserve1, numerator, denominator)?;
        Ok((amount0, amount1))
    }

    fn fetch(&self, handle: PositionHandle) -> Result<PositionState, AllocationError> {
        let state = self.source.position_state(handle).map_err(|err| {
            warn!(%handle, error = %err, "position valuation source failed");
            AllocationError::from_source(handle, err)
        })?;

        if let Some(reason) = state.inconsistency() {
            warn!(%handle, reason, "inconsistent position state");
            return Err(AllocationError::StaleValuation {
                handle,
                reason: reason.to_string(),
            });
        }

        trace!(
            %handle,
            reserve0 = %state.reserve0,
            reserve1 = %state.reserve1,
            supply = %state.total_supply,
            "position state fetched"
        );
        Ok(state)
    }
}

fn check_fraction(numerator: U256, denominator: U256) -> Result<(), AllocationError> {
    if denominator.is_zero() {
        return Err(AllocationError::ArithmeticOverflow);
    }
    if numerator > denominator {
        return Err(AllocationError::InsufficientSupply {
            requested: numerator,
            available: denominator,
        });
    }
    Ok(())
}

fn share_of(
    state: &PositionState,
    numerator: U256,
    denominator: U256,
) -> Result<(U256, U256), AllocationError> {
    let amount0 = mul_div(state.reserve0, numerator, denominator)?;
    let amount1 = mul_div(state.reserve1, numerator, denominator)?;
    Ok((amount0, amount1))
}
