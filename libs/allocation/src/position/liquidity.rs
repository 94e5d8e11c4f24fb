//! Uniswap V3 liquidity-to-amount mathematics
//!
//! Converts a position's liquidity and price range into the token amounts it
//! currently holds. All results are floor-rounded through `mul_div`.

use types::{mul_div, AllocationError, U256};

/// V3 sqrt-price bounds (Q64.96)
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);
/// 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 = U256([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963, 0]);

/// 2^96, the fixed-point one of Q64.96 sqrt prices
pub const Q96: u128 = 1u128 << 96;

/// Concentrated-liquidity amount calculations
pub struct ConcentratedLiquidity;

impl ConcentratedLiquidity {
    /// Token amounts held by `liquidity` over `[sqrt_a, sqrt_b]` at `sqrt_price`
    ///
    /// Below the range the position is all token0, above it all token1.
    pub fn amounts_for_liquidity(
        sqrt_price_x96: U256,
        sqrt_a_x96: U256,
        sqrt_b_x96: U256,
        liquidity: u128,
    ) -> Result<(U256, U256), AllocationError> {
        let (sqrt_lower, sqrt_upper) = if sqrt_a_x96 > sqrt_b_x96 {
            (sqrt_b_x96, sqrt_a_x96)
        } else {
            (sqrt_a_x96, sqrt_b_x96)
        };

        for sqrt in [sqrt_price_x96, sqrt_lower, sqrt_upper] {
            Self::check_sqrt_price(sqrt)?;
        }

        if sqrt_price_x96 <= sqrt_lower {
            let amount0 = Self::amount0_delta(sqrt_lower, sqrt_upper, liquidity)?;
            Ok((amount0, U256::zero()))
        } else if sqrt_price_x96 < sqrt_upper {
            let amount0 = Self::amount0_delta(sqrt_price_x96, sqrt_upper, liquidity)?;
            let amount1 = Self::amount1_delta(sqrt_lower, sqrt_price_x96, liquidity)?;
            Ok((amount0, amount1))
        } else {
            let amount1 = Self::amount1_delta(sqrt_lower, sqrt_upper, liquidity)?;
            Ok((U256::zero(), amount1))
        }
    }

    /// `liquidity * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)` scaled by 2^96
    pub fn amount0_delta(
        sqrt_a_x96: U256,
        sqrt_b_x96: U256,
        liquidity: u128,
    ) -> Result<U256, AllocationError> {
        if sqrt_a_x96 > sqrt_b_x96 {
            return Self::amount0_delta(sqrt_b_x96, sqrt_a_x96, liquidity);
        }
        if sqrt_a_x96.is_zero() {
            return Err(AllocationError::ArithmeticOverflow);
        }

        let numerator1 = U256::from(liquidity) * U256::from(Q96);
        let numerator2 = sqrt_b_x96 - sqrt_a_x96;

        Ok(mul_div(numerator1, numerator2, sqrt_b_x96)? / sqrt_a_x96)
    }

    /// `liquidity * (sqrt_b - sqrt_a) / 2^96`
    pub fn amount1_delta(
        sqrt_a_x96: U256,
        sqrt_b_x96: U256,
        liquidity: u128,
    ) -> Result<U256, AllocationError> {
        if sqrt_a_x96 > sqrt_b_x96 {
            return Self::amount1_delta(sqrt_b_x96, sqrt_a_x96, liquidity);
        }

        mul_div(
            U256::from(liquidity),
            sqrt_b_x96 - sqrt_a_x96,
            U256::from(Q96),
        )
    }

    fn check_sqrt_price(sqrt_price_x96: U256) -> Result<(), AllocationError> {
        if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 > MAX_SQRT_RATIO {
            return Err(AllocationError::ArithmeticOverflow);
        }
        Ok(())
    }
}
