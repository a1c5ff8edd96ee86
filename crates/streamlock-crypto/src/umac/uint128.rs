//! 128-bit arithmetic from 64-bit limbs.
//!
//! POLY128 needs exact 128x128-bit products and sums with carries. Library
//! code builds them from `u64` halves with explicit carry propagation so the
//! hash does not rely on a native 128-bit integer type.
//!
//! # Invariants
//!
//! - Modular helpers require reduced inputs (`< p`) and return reduced
//!   outputs.
//! - No intermediate step overflows; every carry is propagated explicitly.

/// Unsigned 128-bit integer as `hi * 2^64 + lo`.
///
/// Field order makes the derived ordering numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U128 {
    /// Most significant 64 bits
    pub hi: u64,
    /// Least significant 64 bits
    pub lo: u64,
}

const LOW32: u64 = 0xFFFF_FFFF;

impl U128 {
    /// Zero.
    pub const ZERO: Self = Self { hi: 0, lo: 0 };

    /// One.
    pub const ONE: Self = Self { hi: 0, lo: 1 };

    /// Build from limbs.
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Widen a 64-bit value.
    pub const fn from_u64(value: u64) -> Self {
        Self { hi: 0, lo: value }
    }

    /// Sum modulo 2^128 and whether it wrapped.
    pub fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let (lo, carry) = self.lo.overflowing_add(rhs.lo);
        let (hi, c1) = self.hi.overflowing_add(rhs.hi);
        let (hi, c2) = hi.overflowing_add(u64::from(carry));
        (Self { hi, lo }, c1 || c2)
    }

    /// Difference modulo 2^128.
    pub fn wrapping_sub(self, rhs: Self) -> Self {
        let (lo, borrow) = self.lo.overflowing_sub(rhs.lo);
        let hi = self.hi.wrapping_sub(rhs.hi).wrapping_sub(u64::from(borrow));
        Self { hi, lo }
    }

    /// Full 64x64 -> 128-bit product via 32-bit halves.
    pub fn mul_u64(a: u64, b: u64) -> Self {
        let (a0, a1) = (a & LOW32, a >> 32);
        let (b0, b1) = (b & LOW32, b >> 32);

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        let (mid, mid_carry) = p01.overflowing_add(p10);
        let (lo, lo_carry) = p00.overflowing_add(mid << 32);
        // Cannot overflow: the full product is below 2^128.
        let hi = p11 + (mid >> 32) + (u64::from(mid_carry) << 32) + u64::from(lo_carry);

        Self { hi, lo }
    }

    /// Full 128x128 -> 256-bit product as `(high, low)`.
    pub fn mul_wide(self, rhs: Self) -> (Self, Self) {
        let p00 = Self::mul_u64(self.lo, rhs.lo);
        let p01 = Self::mul_u64(self.lo, rhs.hi);
        let p10 = Self::mul_u64(self.hi, rhs.lo);
        let p11 = Self::mul_u64(self.hi, rhs.hi);

        let (r1, c1a) = p00.hi.overflowing_add(p01.lo);
        let (r1, c1b) = r1.overflowing_add(p10.lo);
        let carry1 = u64::from(c1a) + u64::from(c1b);

        let (r2, c2a) = p11.lo.overflowing_add(p01.hi);
        let (r2, c2b) = r2.overflowing_add(p10.hi);
        let (r2, c2c) = r2.overflowing_add(carry1);
        let r3 = p11.hi + u64::from(c2a) + u64::from(c2b) + u64::from(c2c);

        (Self { hi: r3, lo: r2 }, Self { hi: r1, lo: p00.lo })
    }

    /// Product with a 64-bit factor as `(top, low)`, i.e.
    /// `top * 2^128 + low`.
    fn mul_small(self, k: u64) -> (u64, Self) {
        let low = Self::mul_u64(self.lo, k);
        let high = Self::mul_u64(self.hi, k);
        let (mid, carry) = low.hi.overflowing_add(high.lo);
        (high.hi + u64::from(carry), Self { hi: mid, lo: low.lo })
    }

    /// Big-endian byte representation.
    pub fn to_be_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }
}

/// `2^64 - 59`, the largest 64-bit prime.
pub const P64: u64 = 0xFFFF_FFFF_FFFF_FFC5;

/// `2^64 - P64`.
pub(crate) const P64_OFFSET: u64 = 59;

/// `2^128 - 159`, the largest 128-bit prime.
pub const P128: U128 = U128 { hi: u64::MAX, lo: 0xFFFF_FFFF_FFFF_FF61 };

/// `2^128 - P128`.
pub(crate) const P128_OFFSET: u64 = 159;

/// `(x + y) mod P64` for reduced `x`, `y`.
pub fn add_mod_p64(x: u64, y: u64) -> u64 {
    debug_assert!(x < P64 && y < P64);
    let (sum, carry) = x.overflowing_add(y);
    if carry {
        // sum + 2^64 ≡ sum + 59, and sum < 2^64 - 118 here.
        sum + P64_OFFSET
    } else if sum >= P64 {
        sum - P64
    } else {
        sum
    }
}

/// `(x * y) mod P64` for reduced `x`, `y`.
pub fn mul_mod_p64(x: u64, y: u64) -> u64 {
    debug_assert!(x < P64 && y < P64);
    let product = U128::mul_u64(x, y);

    // hi * 2^64 + lo ≡ hi * 59 + lo
    let folded = U128::mul_u64(product.hi, P64_OFFSET);
    let (sum, carry) = product.lo.overflowing_add(folded.lo);
    let top = folded.hi + u64::from(carry);

    // top * 2^64 + sum ≡ top * 59 + sum, with top < 60
    let (sum, carry) = sum.overflowing_add(top * P64_OFFSET);
    let reduced = if carry { sum + P64_OFFSET } else { sum };
    if reduced >= P64 { reduced - P64 } else { reduced }
}

/// `(x + y) mod P128` for reduced `x`, `y`.
pub fn add_mod_p128(x: U128, y: U128) -> U128 {
    debug_assert!(x < P128 && y < P128);
    let (sum, carry) = x.overflowing_add(y);
    if carry {
        let (sum, _) = sum.overflowing_add(U128::from_u64(P128_OFFSET));
        sum
    } else if sum >= P128 {
        sum.wrapping_sub(P128)
    } else {
        sum
    }
}

/// `(x * y) mod P128` for reduced `x`, `y`.
pub fn mul_mod_p128(x: U128, y: U128) -> U128 {
    debug_assert!(x < P128 && y < P128);
    let (high, low) = x.mul_wide(y);

    // high * 2^128 + low ≡ high * 159 + low
    let (top, folded) = high.mul_small(P128_OFFSET);
    let (sum, carry) = low.overflowing_add(folded);
    let top = top + u64::from(carry);

    // top * 2^128 + sum ≡ top * 159 + sum, with top < 160
    let (sum, carry) = sum.overflowing_add(U128::from_u64(top * P128_OFFSET));
    let reduced = if carry {
        let (sum, _) = sum.overflowing_add(U128::from_u64(P128_OFFSET));
        sum
    } else {
        sum
    };
    if reduced >= P128 { reduced.wrapping_sub(P128) } else { reduced }
}
