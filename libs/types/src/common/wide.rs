//! Fixed-width unsigned integers
//!
//! `U256` matches the settlement ledger's native word. `U512` only exists as the
//! double-width intermediate for products of two `U256` values, `U768` for an
//! amount scaled by a fraction whose terms are themselves such products.

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer used for overflow-free intermediates.
    pub struct U512(8);
}

construct_uint! {
    /// 768-bit unsigned integer, `U256 * U512` without overflow.
    pub struct U768(12);
}

impl U256 {
    /// Zero-extend into a 512-bit value.
    pub fn widen(self) -> U512 {
        let mut words = [0u64; 8];
        words[..4].copy_from_slice(&self.0);
        U512(words)
    }
}

impl U512 {
    /// Narrow back to 256 bits, `None` if any high word is set.
    pub fn narrow(self) -> Option<U256> {
        if self.0[4..].iter().any(|word| *word != 0) {
            return None;
        }
        let mut words = [0u64; 4];
        words.copy_from_slice(&self.0[..4]);
        Some(U256(words))
    }

    /// Zero-extend into a 768-bit value.
    pub fn widen(self) -> U768 {
        let mut words = [0u64; 12];
        words[..8].copy_from_slice(&self.0);
        U768(words)
    }
}

impl U768 {
    /// Narrow to 256 bits, `None` if any high word is set.
    pub fn narrow(self) -> Option<U256> {
        if self.0[4..].iter().any(|word| *word != 0) {
            return None;
        }
        let mut words = [0u64; 4];
        words.copy_from_slice(&self.0[..4]);
        Some(U256(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_then_narrow_is_identity() {
        let value = U256::MAX - U256::from(7u64);
        assert_eq!(value.widen().narrow(), Some(value));
    }

    #[test]
    fn narrow_rejects_high_words() {
        let product = U256::MAX.widen() * U256::from(2u64).widen();
        assert_eq!(product.narrow(), None);
    }

    #[test]
    fn triple_product_fits_u768() {
        let pair = U256::MAX.widen() * U256::MAX.widen();
        let triple = U256::MAX.widen().widen() * pair.widen();
        assert_eq!((triple / pair.widen()).narrow(), Some(U256::MAX));
        assert_eq!(triple.narrow(), None);
    }
}
