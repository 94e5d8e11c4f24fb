//! Integer-only ratio arithmetic for portfolio accounting
//!
//! All quantities are unsigned integers in the asset's smallest unit. Ratios are
//! kept as exact numerator/denominator pairs and only converted to a fixed-point
//! scale at the boundary.
//!
//! ## Rounding
//!
//! - `Down` is the default everywhere an amount flows to a user
//! - `Up` is only used for charges the vault collects (fee shares)
//!
//! A 512-bit intermediate holds `a * b` so the multiplication itself never
//! overflows; only a quotient wider than 256 bits is rejected.

use super::errors::AllocationError;
use super::wide::{U256, U512};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// 18-decimal fixed-point scale (1e18 == 1.0)
pub const PRECISION_1E18: u64 = 1_000_000_000_000_000_000;

/// Basis-point scale used by fees and percentages (10_000 == 100%)
pub const TOTAL_WEIGHT_BPS: u32 = 10_000;

/// Rounding direction for division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Floor division
    Down,
    /// Ceiling division
    Up,
}

/// `floor(a * b / denominator)` without intermediate overflow
///
/// Fails with `ArithmeticOverflow` when `denominator == 0` or the quotient does
/// not fit in 256 bits. Never wraps.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, AllocationError> {
    mul_div_rounding(a, b, denominator, Rounding::Down)
}

/// `a * b / denominator` with explicit rounding
pub fn mul_div_rounding(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, AllocationError> {
    if denominator.is_zero() {
        return Err(AllocationError::ArithmeticOverflow);
    }

    let product = a.widen() * b.widen();
    let (mut quotient, remainder) = product.div_mod(denominator.widen());

    if rounding == Rounding::Up && !remainder.is_zero() {
        // quotient < 2^512 - 1 here, the increment cannot wrap
        quotient = quotient + 1u64;
    }

    quotient.narrow().ok_or(AllocationError::ArithmeticOverflow)
}

/// `floor(amount * numerator / denominator)` for a fraction built from products
///
/// Used when the fraction is itself `a * b / (c * d)` so that flooring happens
/// once. The intermediate is 768 bits wide and cannot overflow.
pub fn mul_div_fraction(
    amount: U256,
    numerator: U512,
    denominator: U512,
) -> Result<U256, AllocationError> {
    if denominator.is_zero() {
        return Err(AllocationError::ArithmeticOverflow);
    }

    let product = amount.widen().widen() * numerator.widen();
    (product / denominator.widen())
        .narrow()
        .ok_or(AllocationError::ArithmeticOverflow)
}

/// Smallest `numerators[i] / denominators[i]` over entries with a nonzero denominator
///
/// Zero denominators are unconstrained and skipped. Ties resolve to the lowest
/// index. Fails with `NoConstrainingAsset` when every denominator is zero.
pub fn min_ratio(
    numerators: &[U256],
    denominators: &[U256],
) -> Result<(usize, Ratio), AllocationError> {
    if numerators.len() != denominators.len() {
        return Err(AllocationError::LengthMismatch {
            balances: denominators.len(),
            offers: numerators.len(),
        });
    }
    if numerators.is_empty() {
        return Err(AllocationError::EmptyInput);
    }

    let mut best: Option<(usize, Ratio)> = None;
    for (index, (numerator, denominator)) in numerators.iter().zip(denominators).enumerate() {
        if denominator.is_zero() {
            continue;
        }
        let candidate = Ratio {
            numerator: *numerator,
            denominator: *denominator,
        };
        match &best {
            Some((_, current)) if candidate.cmp_value(current) != Ordering::Less => {}
            _ => best = Some((index, candidate)),
        }
    }

    best.ok_or(AllocationError::NoConstrainingAsset)
}

/// Share of `whole` represented by `part`, in basis points, floor-rounded
pub fn percentage(part: U256, whole: U256) -> Result<u32, AllocationError> {
    if whole.is_zero() {
        return Err(AllocationError::ZeroSupply);
    }
    if part > whole {
        return Err(AllocationError::InsufficientSupply {
            requested: part,
            available: whole,
        });
    }

    let bps = mul_div(part, U256::from(TOTAL_WEIGHT_BPS), whole)?;
    Ok(bps.low_u32())
}

/// Exact non-negative ratio `numerator / denominator`
///
/// Equality is structural (`1/2 != 2/4`); use [`Ratio::cmp_value`] to compare
/// by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    numerator: U256,
    denominator: U256,
}

impl Ratio {
    /// Full acceptance (first deposit)
    pub const ONE: Ratio = Ratio {
        numerator: U256([1, 0, 0, 0]),
        denominator: U256([1, 0, 0, 0]),
    };

    pub fn new(numerator: U256, denominator: U256) -> Result<Self, AllocationError> {
        if denominator.is_zero() {
            return Err(AllocationError::ArithmeticOverflow);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> U256 {
        self.numerator
    }

    pub fn denominator(&self) -> U256 {
        self.denominator
    }

    pub fn is_one(&self) -> bool {
        self.numerator == self.denominator
    }

    /// Compare by value via 512-bit cross multiplication
    pub fn cmp_value(&self, other: &Ratio) -> Ordering {
        let lhs = self.numerator.widen() * other.denominator.widen();
        let rhs = other.numerator.widen() * self.denominator.widen();
        lhs.cmp(&rhs)
    }

    /// `floor(amount * self)`
    pub fn apply(&self, amount: U256) -> Result<U256, AllocationError> {
        mul_div(amount, self.numerator, self.denominator)
    }

    /// Fixed-point value at `precision` (e.g. 1e18), floor-rounded
    pub fn scaled(&self, precision: U256) -> Result<U256, AllocationError> {
        mul_div(self.numerator, precision, self.denominator)
    }

    /// Decimal rendering for logs and reports only, never for arithmetic
    pub fn to_decimal(&self) -> Option<Decimal> {
        let scaled = self.scaled(U256::from(PRECISION_1E18)).ok()?;
        if scaled.bits() > 127 {
            return None;
        }
        Decimal::try_from_i128_with_scale(scaled.as_u128() as i128, 18)
            .ok()
            .map(|value| value.normalize())
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
