//! L2 polynomial hash over the NH outputs.
//!
//! Each L1 output is a coefficient of a polynomial evaluated at the secret
//! key. Up to [`POLY64_MAX_BLOCKS`] outputs are folded modulo `2^64 - 59`.
//! Longer messages switch, once, to `2^128 - 159`: the 64-bit result becomes
//! the first 128-bit coefficient and later outputs are paired into 128-bit
//! words.
//!
//! Coefficients too close to the modulus are escaped: the marker `p - 1` is
//! absorbed first, then the coefficient minus the offset `2^n - p`.

use super::{
    BLOCK_LEN, POLY64_MAX_BYTES,
    key::L2Key,
    uint128::{
        P64, P64_OFFSET, P128, P128_OFFSET, U128, add_mod_p64, add_mod_p128, mul_mod_p64,
        mul_mod_p128,
    },
};
use zeroize::Zeroize;

/// Number of L1 outputs hashed with POLY64 before switching to POLY128.
pub(crate) const POLY64_MAX_BLOCKS: u64 = POLY64_MAX_BYTES / BLOCK_LEN as u64;

/// Coefficients at or above `2^64 - 2^32` are escaped.
const POLY64_MAX_WORD: u64 = 0xFFFF_FFFF_0000_0000;

/// Coefficients at or above `2^128 - 2^96` are escaped.
const POLY128_MAX_WORD: U128 = U128 { hi: 0xFFFF_FFFF_0000_0000, lo: 0 };

/// Padding byte `0x80` in the most significant position of a 64-bit half.
const PAD_BIT: u64 = 1 << 63;

/// One POLY64 step: `y = k * y + m (mod p64)`, escaping large `m`.
pub(crate) fn poly64(k: u64, y: u64, m: u64) -> u64 {
    if m >= POLY64_MAX_WORD {
        let y = add_mod_p64(mul_mod_p64(k, y), P64 - 1);
        add_mod_p64(mul_mod_p64(k, y), m - P64_OFFSET)
    } else {
        add_mod_p64(mul_mod_p64(k, y), m)
    }
}

/// One POLY128 step: `y = k * y + m (mod p128)`, escaping large `m`.
pub(crate) fn poly128(k: U128, y: U128, m: U128) -> U128 {
    if m >= POLY128_MAX_WORD {
        let marker = P128.wrapping_sub(U128::ONE);
        let y = add_mod_p128(mul_mod_p128(k, y), marker);
        add_mod_p128(mul_mod_p128(k, y), m.wrapping_sub(U128::from_u64(P128_OFFSET)))
    } else {
        add_mod_p128(mul_mod_p128(k, y), m)
    }
}

/// Running L2 hash for one iteration.
#[derive(Clone, Copy)]
pub(crate) struct Accumulator {
    /// POLY64 value in `y.lo` until the switch, POLY128 value after.
    y: U128,
    /// First half of an incomplete 128-bit coefficient.
    pending: Option<u64>,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self { y: U128::ONE, pending: None }
    }
}

impl Zeroize for Accumulator {
    fn zeroize(&mut self) {
        self.y.hi.zeroize();
        self.y.lo.zeroize();
        self.pending.zeroize();
    }
}

impl Accumulator {
    /// Absorb the L1 output of block number `index` (1-based).
    pub(crate) fn absorb(&mut self, key: &L2Key, l1: u64, index: u64) {
        if index <= POLY64_MAX_BLOCKS {
            self.y = U128::from_u64(poly64(key.k64, self.y.lo, l1));
            return;
        }

        if index == POLY64_MAX_BLOCKS + 1 {
            self.y = poly128(key.k128, U128::ONE, self.y);
        }
        match self.pending.take() {
            None => self.pending = Some(l1),
            Some(hi) => self.y = poly128(key.k128, self.y, U128::new(hi, l1)),
        }
    }

    /// Final L2 output after `blocks` L1 outputs.
    pub(crate) fn finish(&mut self, key: &L2Key, blocks: u64) -> U128 {
        if blocks <= POLY64_MAX_BLOCKS {
            return U128::from_u64(self.y.lo);
        }
        let padded = match self.pending.take() {
            Some(hi) => U128::new(hi, PAD_BIT),
            None => U128::new(PAD_BIT, 0),
        };
        poly128(key.k128, self.y, padded)
    }
}
