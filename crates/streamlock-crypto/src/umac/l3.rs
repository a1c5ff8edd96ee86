//! L3 hash: fold the 128-bit L2 output into 32 bits.

use super::uint128::U128;

/// `2^36 - 5`, the L3 modulus.
pub(crate) const P36: u64 = 0x0000_000F_FFFF_FFFB;

/// Inner product of the eight 16-bit big-endian chunks of `m` with `mul`,
/// reduced modulo [`P36`], truncated to 32 bits and masked with `pad`.
///
/// `mul` entries must already be reduced modulo [`P36`].
pub(crate) fn hash(mul: &[u64; 8], pad: u32, m: U128) -> u32 {
    let mut y = 0u64;
    for (i, k) in mul.iter().enumerate() {
        let word = if i < 4 { m.hi } else { m.lo };
        let chunk = (word >> (16 * (3 - i % 4))) & 0xffff;
        // Eight terms below 2^52 each cannot overflow.
        y += k * chunk;
    }
    ((y % P36) as u32) ^ pad
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_input_yields_pad() {
        assert_eq!(hash(&[P36 - 1; 8], 0xdead_beef, U128::ZERO), 0xdead_beef);
    }

    #[test]
    fn chunks_are_taken_most_significant_first() {
        let mut mul = [0u64; 8];
        mul[0] = 1;
        assert_eq!(hash(&mul, 0, U128::new(0xabcd_0000_0000_0000, 0)), 0xabcd);

        let mut mul = [0u64; 8];
        mul[7] = 2;
        assert_eq!(hash(&mul, 0, U128::new(0, 0x1234)), 0x2468);
    }

    #[test]
    fn reduces_before_truncating() {
        // 0xffff * (P36 - 1) ≡ -0xffff ≡ P36 - 0xffff
        let mut mul = [0u64; 8];
        mul[3] = P36 - 1;
        let want = ((P36 - 0xffff) as u32) ^ 1;
        assert_eq!(hash(&mul, 1, U128::new(0xffff, 0)), want);
    }
}
