//! Byte and word packing shared by the cipher engines and UMAC.
//!
//! Every cipher in this crate is specified over little-endian 32-bit words
//! while UMAC key material is read big-endian. Both directions go through the
//! helpers below so there is exactly one packing path regardless of host
//! endianness. Rotations use the inherent `rotate_left` on `u32`.

/// Read the `index`-th little-endian 32-bit word of `bytes`.
#[inline]
pub(crate) fn load_u32_le(bytes: &[u8], index: usize) -> u32 {
    let b = &bytes[4 * index..4 * index + 4];
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Read the `index`-th big-endian 32-bit word of `bytes`.
#[inline]
pub(crate) fn load_u32_be(bytes: &[u8], index: usize) -> u32 {
    let b = &bytes[4 * index..4 * index + 4];
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Read the `index`-th big-endian 64-bit word of `bytes`.
#[inline]
pub(crate) fn load_u64_be(bytes: &[u8], index: usize) -> u64 {
    let b = &bytes[8 * index..8 * index + 8];
    u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Unpack `N` little-endian words from the front of `bytes`.
#[inline]
pub(crate) fn words_le<const N: usize>(bytes: &[u8]) -> [u32; N] {
    debug_assert!(bytes.len() >= 4 * N, "need {} bytes, got {}", 4 * N, bytes.len());
    core::array::from_fn(|i| load_u32_le(bytes, i))
}

/// Pack `words` little-endian into `out`, which must hold `4 * words.len()`
/// bytes.
#[inline]
pub(crate) fn store_words_le(words: &[u32], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 4 * words.len());
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// XOR `keystream` into `buf` byte by byte. Lengths must match.
#[inline]
pub(crate) fn xor_in_place(buf: &mut [u8], keystream: &[u8]) {
    debug_assert_eq!(buf.len(), keystream.len());
    for (b, k) in buf.iter_mut().zip(keystream) {
        *b ^= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_words_roundtrip() {
        let bytes: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0xaa, 0xbb, 0xcc, 0xdd];
        let words: [u32; 2] = words_le(&bytes);
        assert_eq!(words, [0x0403_0201, 0xddcc_bbaa]);

        let mut out = [0u8; 8];
        store_words_le(&words, &mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn big_endian_loads() {
        let bytes: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(load_u32_be(&bytes, 1), 0x0506_0708);
        assert_eq!(load_u64_be(&bytes, 0), 0x0102_0304_0506_0708);
    }

    #[test]
    fn xor_twice_restores() {
        let original = *b"attack at dawn";
        let mut buf = original;
        let pad = [0x5au8; 14];
        xor_in_place(&mut buf, &pad);
        assert_ne!(buf, original);
        xor_in_place(&mut buf, &pad);
        assert_eq!(buf, original);
    }
}
