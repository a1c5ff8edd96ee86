//! NH, the first-level compression function.
//!
//! NH processes 32-byte groups: eight little-endian message words are added
//! to eight key words modulo 2^32 and the four cross products are summed
//! modulo 2^64.

use crate::bits;

/// Bytes consumed per NH group.
pub(crate) const GROUP_LEN: usize = 32;

/// NH of one 32-byte group against the key words starting at `key[0]`.
pub(crate) fn group(key: &[u32], message: &[u8]) -> u64 {
    debug_assert_eq!(message.len(), GROUP_LEN);
    debug_assert!(key.len() >= 8);

    let m: [u32; 8] = bits::words_le(message);
    let mut y = 0u64;
    for j in 0..4 {
        let a = u64::from(m[j].wrapping_add(key[j]));
        let b = u64::from(m[j + 4].wrapping_add(key[j + 4]));
        y = y.wrapping_add(a * b);
    }
    y
}
