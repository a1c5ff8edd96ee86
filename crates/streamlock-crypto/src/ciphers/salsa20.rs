//! Salsa20/8, Salsa20/12 and Salsa20/20.
//!
//! 128- or 256-bit key, 64-bit IV, 64 bytes of output per block. The input
//! block holds the constants, key, IV and a 64-bit block counter; each output
//! block is the permuted input added word-wise to the input. The counter makes
//! the keystream randomly accessible via [`Salsa20::set_counter`].
//!
//! ```text
//!  0: const   1: key0    2: key1    3: key2
//!  4: key3    5: const   6: iv0     7: iv1
//!  8: ctr_lo  9: ctr_hi 10: const  11: key4
//! 12: key5   13: key6   14: key7   15: const
//! ```
//!
//! For 128-bit keys words 11..14 repeat the key and the tau constants are
//! used; 256-bit keys use sigma.

use zeroize::Zeroize;

use crate::{
    bits,
    keystream::{Keystream, SeekableKeystream},
};

/// Length of a 128-bit key in bytes.
pub const KEY_LEN_128: usize = 16;

/// Length of a 256-bit key in bytes.
pub const KEY_LEN_256: usize = 32;

/// IV length in bytes.
pub const IV_LEN: usize = 8;

/// Bytes produced per block.
pub const CHUNK_LEN: usize = 64;

const EXPAND_0: u32 = 0x6170_7865;
const EXPAND_15: u32 = 0x6b20_6574;
/// "nd 1" / "6-by" for 128-bit keys.
const TAU: [u32; 2] = [0x3120_646e, 0x7962_2d36];
/// "nd 3" / "2-by" for 256-bit keys.
const SIGMA: [u32; 2] = [0x3320_646e, 0x7962_2d32];

/// Column quarterround index sets.
const COLUMNS: [[usize; 4]; 4] = [[0, 4, 8, 12], [5, 9, 13, 1], [10, 14, 2, 6], [15, 3, 7, 11]];

/// Row quarterround index sets.
const ROWS: [[usize; 4]; 4] = [[0, 1, 2, 3], [5, 6, 7, 4], [10, 11, 8, 9], [15, 12, 13, 14]];

/// Round-count variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Salsa20Variant {
    /// 8 rounds.
    Salsa20_8,
    /// 12 rounds.
    Salsa20_12,
    /// 20 rounds.
    Salsa20_20,
}

impl Salsa20Variant {
    /// Number of double rounds (column round + row round).
    pub fn double_rounds(self) -> usize {
        match self {
            Self::Salsa20_8 => 4,
            Self::Salsa20_12 => 6,
            Self::Salsa20_20 => 10,
        }
    }
}

fn quarterround(y: &mut [u32; 16], idx: [usize; 4]) {
    let [a, b, c, d] = idx;
    y[b] ^= y[a].wrapping_add(y[d]).rotate_left(7);
    y[c] ^= y[b].wrapping_add(y[a]).rotate_left(9);
    y[d] ^= y[c].wrapping_add(y[b]).rotate_left(13);
    y[a] ^= y[d].wrapping_add(y[c]).rotate_left(18);
}

fn doubleround(y: &mut [u32; 16]) {
    for idx in COLUMNS {
        quarterround(y, idx);
    }
    for idx in ROWS {
        quarterround(y, idx);
    }
}

/// The Salsa20 core: `double_rounds` double rounds plus feed-forward.
fn hash(input: &[u32; 16], double_rounds: usize) -> [u32; 16] {
    let mut state = *input;
    for _ in 0..double_rounds {
        doubleround(&mut state);
    }
    for (s, i) in state.iter_mut().zip(input) {
        *s = s.wrapping_add(*i);
    }
    state
}

/// Salsa20 master state: constants and key laid out in the input block.
#[derive(Clone)]
pub struct Salsa20Key {
    input: [u32; 16],
    variant: Salsa20Variant,
}

impl Salsa20Key {
    /// Key setup for a 128-bit key.
    pub fn new_128(variant: Salsa20Variant, key: &[u8; KEY_LEN_128]) -> Self {
        Self::from_halves(variant, key, key, TAU)
    }

    /// Key setup for a 256-bit key.
    pub fn new_256(variant: Salsa20Variant, key: &[u8; KEY_LEN_256]) -> Self {
        let (first, second) = key.split_at(KEY_LEN_128);
        Self::from_halves(variant, first, second, SIGMA)
    }

    fn from_halves(variant: Salsa20Variant, first: &[u8], second: &[u8], constants: [u32; 2]) -> Self {
        let k0: [u32; 4] = bits::words_le(first);
        let k1: [u32; 4] = bits::words_le(second);

        let mut input = [0u32; 16];
        input[0] = EXPAND_0;
        input[1..5].copy_from_slice(&k0);
        input[5] = constants[0];
        input[10] = constants[1];
        input[11..15].copy_from_slice(&k1);
        input[15] = EXPAND_15;

        Self { input, variant }
    }

    /// Round-count variant this key was set up for.
    pub fn variant(&self) -> Salsa20Variant {
        self.variant
    }

    /// Derive a session for `iv` with the block counter at zero.
    ///
    /// The same IV must never be used twice with the same key.
    pub fn session(&self, iv: &[u8; IV_LEN]) -> Salsa20 {
        let iv_words: [u32; 2] = bits::words_le(iv);
        let mut input = self.input;
        input[6] = iv_words[0];
        input[7] = iv_words[1];
        input[8] = 0;
        input[9] = 0;
        Salsa20 { input, double_rounds: self.variant.double_rounds() }
    }
}

impl Drop for Salsa20Key {
    fn drop(&mut self) {
        self.input.zeroize();
    }
}

/// Salsa20 session state.
#[derive(Clone)]
pub struct Salsa20 {
    input: [u32; 16],
    double_rounds: usize,
}

impl Salsa20 {
    /// Index of the next block to be produced.
    pub fn counter(&self) -> u64 {
        u64::from(self.input[8]) | (u64::from(self.input[9]) << 32)
    }

    /// Seek to block `counter`; the next extraction produces that block.
    pub fn set_counter(&mut self, counter: u64) {
        self.input[8] = counter as u32;
        self.input[9] = (counter >> 32) as u32;
    }
}

impl Keystream for Salsa20 {
    fn chunk_size(&self) -> usize {
        CHUNK_LEN
    }

    fn extract_chunk(&mut self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), CHUNK_LEN);
        let mut block = hash(&self.input, self.double_rounds);
        bits::store_words_le(&block, out);
        block.zeroize();
        self.set_counter(self.counter().wrapping_add(1));
    }
}

impl SeekableKeystream for Salsa20 {
    fn seek_chunk(&mut self, chunk_index: u64) {
        self.set_counter(chunk_index);
    }

    fn chunk_position(&self) -> u64 {
        self.counter()
    }
}

impl Drop for Salsa20 {
    fn drop(&mut self) {
        self.input.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(session: &mut Salsa20) -> String {
        let mut out = [0u8; CHUNK_LEN];
        session.extract_chunk(&mut out);
        hex::encode(out)
    }

    fn single_bit_key() -> [u8; 16] {
        let mut key = [0u8; 16];
        key[0] = 0x80;
        key
    }

    #[test]
    fn quarterround_reference_values() {
        let mut y = [0u32; 16];
        y[..4].copy_from_slice(&[0xd391_7c5b, 0x55f1_c407, 0x52a5_8a7a, 0x8f88_7a3b]);
        quarterround(&mut y, [0, 1, 2, 3]);
        assert_eq!(y[..4], [0x3e2f_308c, 0xd90a_8f36, 0x6ab2_a923, 0x2883_524c]);
    }

    #[test]
    fn variants_with_single_bit_key() {
        let cases = [
            (
                Salsa20Variant::Salsa20_8,
                "a9c9f888ab552a2d1bbff9f36bebeb337a8b4b107c75b63bae26cb9a235bba9d\
                 784f38befc3adf4cd3e266687ea7b9f09ba650ae81eac6063ae31ff12218ddc5",
                "bee85903bea506b05fc04795836faaac7f93f785d473eb762576d96b4a65ffe4\
                 63b34aae696777fc6351b67c3753b89ba6b197bd655d1d9ca86e067f4d770220",
            ),
            (
                Salsa20Variant::Salsa20_12,
                "fc207dbfc76c5e1774961e7a5aad09069b2225ac1ce0fe7a0ce77003e7e5bdf8\
                 b31af821000813e6c56b8c1771d6ee7039b2fbd0a68e8ad70a3944b677937897",
                "a52ed8c37014b10ec0aa8e05b5ceee123a1017557fb3b15c53e6c5ea8300bf74\
                 264a73b5315dc821ad2cab0f3bb2f152bdaea3aee97ba04b8e72a7b40dcc6ba4",
            ),
            (
                Salsa20Variant::Salsa20_20,
                "4dfa5e481da23ea09a31022050859936da52fcee218005164f267cb65f5cfd7f\
                 2b4f97e0ff16924a52df269515110a07f9e460bc65ef95da58f740b7d1dbb0aa",
                "b375703739daced4dd4059fd71c3c47fc2f9939670fad4a46066adcc6a564578\
                 3308b90ffb72be04a6b147cbe38cc0c3b9267c296a92a7c69873f9f263be9703",
            ),
        ];

        for (variant, first, seventh) in cases {
            let mut session = Salsa20Key::new_128(variant, &single_bit_key()).session(&[0u8; 8]);
            assert_eq!(block(&mut session), first, "{variant:?} block 0");
            assert_eq!(session.counter(), 1);

            session.set_counter(7);
            assert_eq!(block(&mut session), seventh, "{variant:?} block 7");
            assert_eq!(session.counter(), 8);
        }
    }

    #[test]
    fn full_length_keys() {
        let mut key = [0u8; 32];
        key[0] = 0x80;
        let mut session = Salsa20Key::new_256(Salsa20Variant::Salsa20_20, &key).session(&[0u8; 8]);
        assert_eq!(
            block(&mut session),
            "e3be8fdd8beca2e3ea8ef9475b29a6e7003951e1097a5c38d23b7a5fad9f6844\
             b22c97559e2723c7cbbd3fe4fc8d9a0744652a83e72a9c461876af4d7ef1a117"
        );

        let key: [u8; 32] = core::array::from_fn(|i| i as u8 + 1);
        let iv: [u8; 8] = core::array::from_fn(|i| 3 * i as u8 + 1);
        let mut session = Salsa20Key::new_256(Salsa20Variant::Salsa20_20, &key).session(&iv);
        assert_eq!(
            block(&mut session),
            "db331a4040a1383f75c673a1cf991873cd2a321ff79fa024712ca9b91cf421e4\
             c840528a88f5c7ef9080b6e0b3832c786fecfecb1a64dff416673306eed768e3"
        );
    }

    #[test]
    fn counter_carries_into_high_word() {
        let master = Salsa20Key::new_128(Salsa20Variant::Salsa20_8, &single_bit_key());
        let mut session = master.session(&[0u8; 8]);
        session.set_counter(u64::from(u32::MAX));
        let _ = block(&mut session);
        assert_eq!(session.counter(), 1 << 32);
    }

    #[test]
    fn random_access_matches_sequential() {
        let master = Salsa20Key::new_128(Salsa20Variant::Salsa20_12, &[0x42; 16]);
        let mut sequential = master.session(&[9u8; 8]);
        let blocks: Vec<String> = (0..5).map(|_| block(&mut sequential)).collect();

        let mut seeking = master.session(&[9u8; 8]);
        for i in [3u64, 0, 4, 1, 2] {
            seeking.seek_chunk(i);
            assert_eq!(block(&mut seeking), blocks[i as usize]);
        }
    }
}
