//! UHASH key material drawn from a keystream.

use zeroize::Zeroize;

use super::{
    BLOCK_LEN, MAX_ITERATIONS, UhashTag, UhashType,
    l3::P36,
    state::UhashState,
    uint128::U128,
};
use crate::{
    bits,
    buffered::BufferedCipher,
    keystream::Keystream,
};

/// NH key words: one block's worth plus 4 extra words per extra iteration.
pub(crate) const L1_KEY_WORDS: usize = BLOCK_LEN / 4 + 4 * (MAX_ITERATIONS - 1);

/// Bytes drawn per iteration for the L2 keys.
const L2_KEY_BYTES: usize = 24;

/// Bytes drawn per iteration for the L3 multipliers.
const L3_KEY1_BYTES: usize = 64;

/// Bytes drawn per iteration for the L3 pad.
const L3_KEY2_BYTES: usize = 4;

/// Mask applied to each 64-bit half of the polynomial keys.
const POLY_KEY_MASK: u64 = 0x01FF_FFFF_01FF_FFFF;

/// Polynomial keys for one iteration.
#[derive(Clone, Copy, Default)]
pub(crate) struct L2Key {
    pub(crate) k64: u64,
    pub(crate) k128: U128,
}

impl Zeroize for L2Key {
    fn zeroize(&mut self) {
        self.k64.zeroize();
        self.k128.hi.zeroize();
        self.k128.lo.zeroize();
    }
}

/// Key for UHASH-32/64/96/128.
///
/// Layout per iteration `i`:
/// - L1: NH key words `l1[4i .. 4i + 256]` (iterations share most words)
/// - L2: `k64` and `k128`, masked so every coefficient stays below `2^25`
/// - L3: eight multipliers reduced modulo `2^36 - 5` and a 32-bit pad
///
/// # Security
///
/// All key material is zeroized on drop. A key must only be used with
/// states of the same [`UhashType`].
#[derive(Clone)]
pub struct UhashKey {
    kind: UhashType,
    pub(crate) l1: [u32; L1_KEY_WORDS],
    pub(crate) l2: [L2Key; MAX_ITERATIONS],
    pub(crate) l3_mul: [[u64; 8]; MAX_ITERATIONS],
    pub(crate) l3_pad: [u32; MAX_ITERATIONS],
}

impl UhashKey {
    /// Draw a key from `source`, consuming exactly
    /// [`UhashType::key_material_len`] keystream bytes.
    ///
    /// Material is taken in order: NH key, polynomial keys, L3 multipliers,
    /// L3 pads. All words are read big-endian.
    pub fn derive<K: Keystream>(kind: UhashType, source: &mut BufferedCipher<K>) -> Self {
        let iters = kind.iterations();
        let mut material = [0u8; L1_KEY_WORDS * 4];

        let l1_len = BLOCK_LEN + 16 * (iters - 1);
        source.extract(&mut material[..l1_len]);
        let mut l1 = [0u32; L1_KEY_WORDS];
        for (i, word) in l1.iter_mut().take(l1_len / 4).enumerate() {
            *word = bits::load_u32_be(&material, i);
        }

        let mut l2 = [L2Key::default(); MAX_ITERATIONS];
        source.extract(&mut material[..L2_KEY_BYTES * iters]);
        for (i, key) in l2.iter_mut().take(iters).enumerate() {
            let base = 3 * i;
            key.k64 = bits::load_u64_be(&material, base) & POLY_KEY_MASK;
            key.k128 = U128::new(
                bits::load_u64_be(&material, base + 1) & POLY_KEY_MASK,
                bits::load_u64_be(&material, base + 2) & POLY_KEY_MASK,
            );
        }

        let mut l3_mul = [[0u64; 8]; MAX_ITERATIONS];
        source.extract(&mut material[..L3_KEY1_BYTES * iters]);
        for (i, muls) in l3_mul.iter_mut().take(iters).enumerate() {
            for (j, k) in muls.iter_mut().enumerate() {
                *k = bits::load_u64_be(&material, 8 * i + j) % P36;
            }
        }

        let mut l3_pad = [0u32; MAX_ITERATIONS];
        source.extract(&mut material[..L3_KEY2_BYTES * iters]);
        for (i, pad) in l3_pad.iter_mut().take(iters).enumerate() {
            *pad = bits::load_u32_be(&material, i);
        }

        material.zeroize();
        Self { kind, l1, l2, l3_mul, l3_pad }
    }

    /// Key for 32-bit tags.
    pub fn uhash32<K: Keystream>(source: &mut BufferedCipher<K>) -> Self {
        Self::derive(UhashType::Uhash32, source)
    }

    /// Key for 64-bit tags.
    pub fn uhash64<K: Keystream>(source: &mut BufferedCipher<K>) -> Self {
        Self::derive(UhashType::Uhash64, source)
    }

    /// Key for 96-bit tags.
    pub fn uhash96<K: Keystream>(source: &mut BufferedCipher<K>) -> Self {
        Self::derive(UhashType::Uhash96, source)
    }

    /// Key for 128-bit tags.
    pub fn uhash128<K: Keystream>(source: &mut BufferedCipher<K>) -> Self {
        Self::derive(UhashType::Uhash128, source)
    }

    /// Tag width this key produces.
    pub fn kind(&self) -> UhashType {
        self.kind
    }

    /// Tag length in bytes.
    pub fn tag_len(&self) -> usize {
        self.kind.tag_len()
    }

    /// Hash a complete message in one call.
    pub fn hash(&self, message: &[u8]) -> UhashTag {
        let mut state = UhashState::new(self.kind);
        state.update(self, message);
        state.finish(self)
    }
}

impl Drop for UhashKey {
    fn drop(&mut self) {
        self.l1.zeroize();
        self.l2.zeroize();
        self.l3_mul.zeroize();
        self.l3_pad.zeroize();
    }
}
