//! In-memory position source
//!
//! Holds the latest known state for each wrapped position. Writers replace a
//! snapshot whenever the pool moves; readers always see the newest snapshot.

use super::liquidity::ConcentratedLiquidity;
use super::{PositionSource, PositionState};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;
use types::{AssetId, PositionHandle, SourceError, U256};

/// Pool liquidity and price range of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquiditySnapshot {
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub sqrt_lower_x96: U256,
    pub sqrt_upper_x96: U256,
    /// Uncollected fees in token0
    pub tokens_owed0: U256,
    /// Uncollected fees in token1
    pub tokens_owed1: U256,
}

/// How a position's reserves are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSnapshot {
    /// Reserves already computed upstream
    Reserves { amount0: U256, amount1: U256 },
    /// Reserves derived from liquidity at query time
    Liquidity(LiquiditySnapshot),
}

impl PositionSnapshot {
    fn reserves(&self) -> Result<(U256, U256), SourceError> {
        match self {
            PositionSnapshot::Reserves { amount0, amount1 } => Ok((*amount0, *amount1)),
            PositionSnapshot::Liquidity(snapshot) => {
                if snapshot.sqrt_lower_x96 >= snapshot.sqrt_upper_x96 {
                    return Err(SourceError::Unavailable(
                        "tick range lower bound not below upper bound".to_string(),
                    ));
                }
                let (amount0, amount1) = ConcentratedLiquidity::amounts_for_liquidity(
                    snapshot.sqrt_price_x96,
                    snapshot.sqrt_lower_x96,
                    snapshot.sqrt_upper_x96,
                    snapshot.liquidity,
                )
                .map_err(|err| SourceError::Unavailable(err.to_string()))?;

                let amount0 = amount0
                    .checked_add(snapshot.tokens_owed0)
                    .ok_or_else(|| SourceError::Unavailable("token0 reserve overflow".to_string()))?;
                let amount1 = amount1
                    .checked_add(snapshot.tokens_owed1)
                    .ok_or_else(|| SourceError::Unavailable("token1 reserve overflow".to_string()))?;
                Ok((amount0, amount1))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct BookEntry {
    token0: AssetId,
    token1: AssetId,
    total_supply: U256,
    snapshot: PositionSnapshot,
}

/// Thread-safe map of wrapped positions
#[derive(Debug, Default)]
pub struct PositionBook {
    positions: RwLock<HashMap<PositionHandle, BookEntry>>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a position
    pub fn insert(
        &self,
        handle: PositionHandle,
        token0: impl Into<AssetId>,
        token1: impl Into<AssetId>,
        total_supply: U256,
        snapshot: PositionSnapshot,
    ) {
        let entry = BookEntry {
            token0: token0.into(),
            token1: token1.into(),
            total_supply,
            snapshot,
        };
        self.positions.write().insert(handle, entry);
        trace!(%handle, "position registered");
    }

    /// Replace the reserves snapshot, `false` if the handle is unknown
    pub fn update_snapshot(&self, handle: PositionHandle, snapshot: PositionSnapshot) -> bool {
        match self.positions.write().get_mut(&handle) {
            Some(entry) => {
                entry.snapshot = snapshot;
                trace!(%handle, "position snapshot updated");
                true
            }
            None => false,
        }
    }

    /// Replace the wrapper supply, `false` if the handle is unknown
    pub fn set_total_supply(&self, handle: PositionHandle, total_supply: U256) -> bool {
        match self.positions.write().get_mut(&handle) {
            Some(entry) => {
                entry.total_supply = total_supply;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, handle: PositionHandle) -> bool {
        self.positions.write().remove(&handle).is_some()
    }

    pub fn contains(&self, handle: PositionHandle) -> bool {
        self.positions.read().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.positions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.read().is_empty()
    }
}

impl PositionSource for PositionBook {
    fn position_state(&self, handle: PositionHandle) -> Result<PositionState, SourceError> {
        let entry = self
            .positions
            .read()
            .get(&handle)
            .cloned()
            .ok_or(SourceError::NotFound)?;

        let (reserve0, reserve1) = entry.snapshot.reserves()?;
        Ok(PositionState {
            token0: entry.token0,
            token1: entry.token1,
            reserve0,
            reserve1,
            total_supply: entry.total_supply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::liquidity::Q96;

    fn u(value: u64) -> U256 {
        U256::from(value)
    }

    #[test]
    fn test_reserves_snapshot_reported_verbatim() {
        let book = PositionBook::new();
        let handle = PositionHandle::new(11);
        book.insert(
            handle,
            "USDT",
            "WBNB",
            u(100),
            PositionSnapshot::Reserves {
                amount0: u(5_000),
                amount1: u(7),
            },
        );

        let state = book.position_state(handle).unwrap();
        assert_eq!(state.reserve0, u(5_000));
        assert_eq!(state.reserve1, u(7));
        assert_eq!(state.token1.as_str(), "WBNB");
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_liquidity_snapshot_adds_owed_fees() {
        let book = PositionBook::new();
        let handle = PositionHandle::new(12);
        let q96 = U256::from(Q96);
        book.insert(
            handle,
            "USDC",
            "WETH",
            u(1),
            PositionSnapshot::Liquidity(LiquiditySnapshot {
                liquidity: 1_000_000,
                sqrt_price_x96: q96,
                sqrt_lower_x96: q96 / 2u64,
                sqrt_upper_x96: q96 * 2u64,
                tokens_owed0: u(3),
                tokens_owed1: u(4),
            }),
        );

        let state = book.position_state(handle).unwrap();
        assert_eq!(state.reserve0, u(500_003));
        assert_eq!(state.reserve1, u(500_004));
    }

    #[test]
    fn test_inverted_range_is_unavailable() {
        let book = PositionBook::new();
        let handle = PositionHandle::new(13);
        let q96 = U256::from(Q96);
        book.insert(
            handle,
            "USDC",
            "WETH",
            u(1),
            PositionSnapshot::Liquidity(LiquiditySnapshot {
                liquidity: 1,
                sqrt_price_x96: q96,
                sqrt_lower_x96: q96 * 2u64,
                sqrt_upper_x96: q96,
                tokens_owed0: U256::zero(),
                tokens_owed1: U256::zero(),
            }),
        );

        assert!(matches!(
            book.position_state(handle),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_updates_and_removal() {
        let book = PositionBook::new();
        let handle = PositionHandle::new(14);
        let reserves = |a: u64, b: u64| PositionSnapshot::Reserves {
            amount0: u(a),
            amount1: u(b),
        };

        assert!(!book.update_snapshot(handle, reserves(1, 1)));
        book.insert(handle, "A", "B", u(10), reserves(1, 1));
        assert!(book.update_snapshot(handle, reserves(2, 3)));
        assert!(book.set_total_supply(handle, u(20)));

        let state = book.position_state(handle).unwrap();
        assert_eq!((state.reserve0, state.reserve1), (u(2), u(3)));
        assert_eq!(state.total_supply, u(20));

        assert!(book.remove(handle));
        assert!(book.is_empty());
        assert_eq!(book.position_state(handle), Err(SourceError::NotFound));
    }
}
