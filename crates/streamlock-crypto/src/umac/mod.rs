//! UMAC universal hashing (UHASH-32/64/96/128).
//!
//! UHASH compresses a message of any length in three layers. Each of the
//! 1-4 iterations uses independent keys and contributes 32 bits of tag.
//!
//! ```text
//! message ─┬─ 1024-byte blocks ──> L1: NH + bit length  (64 bits per block)
//!          │                              │
//!          │        len <= 1024 ──────────┤ (L2 skipped: 0^64 || L1)
//!          │                              ▼
//!          │                     L2: POLY64, then POLY128 past 2^24 bytes
//!          │                              │ (128 bits)
//!          │                              ▼
//!          └──────────────────>  L3: inner product mod 2^36 - 5, ^ pad
//!                                         │ (32 bits)
//!                                         ▼
//!                                   tag word, big-endian
//! ```
//!
//! Keys are drawn from a [`BufferedCipher`](crate::BufferedCipher) keystream
//! with [`UhashKey::derive`]. Tags are not encrypted here; the secure channel
//! encrypts them along with the rest of the frame.
//!
//! # Security
//!
//! - UHASH is only an almost-universal hash. A tag is unforgeable only when
//!   it is hidden from the adversary (encrypted or masked with a one-time
//!   pad) and each key hashes messages under a fresh keystream position.
//! - Key material is zeroized on drop.

mod key;
mod l3;
mod nh;
mod poly;
mod state;
pub mod uint128;

pub use key::UhashKey;
pub use state::UhashState;

/// Bytes per L1 block.
pub const BLOCK_LEN: usize = 1024;

/// Message length up to which L2 uses the 64-bit polynomial.
pub const POLY64_MAX_BYTES: u64 = 1 << 24;

/// Highest number of parallel iterations (UHASH-128).
pub const MAX_ITERATIONS: usize = 4;

/// Longest tag in bytes.
pub const MAX_TAG_LEN: usize = 4 * MAX_ITERATIONS;

/// Tag width, i.e. the number of parallel UHASH iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UhashType {
    /// One iteration, 4-byte tags.
    Uhash32,
    /// Two iterations, 8-byte tags.
    Uhash64,
    /// Three iterations, 12-byte tags.
    Uhash96,
    /// Four iterations, 16-byte tags.
    Uhash128,
}

impl UhashType {
    /// All widths, narrowest first.
    pub const ALL: [Self; 4] = [Self::Uhash32, Self::Uhash64, Self::Uhash96, Self::Uhash128];

    /// Number of independent iterations.
    pub fn iterations(self) -> usize {
        match self {
            Self::Uhash32 => 1,
            Self::Uhash64 => 2,
            Self::Uhash96 => 3,
            Self::Uhash128 => 4,
        }
    }

    /// Tag length in bytes.
    pub fn tag_len(self) -> usize {
        4 * self.iterations()
    }

    /// Keystream bytes consumed by [`UhashKey::derive`].
    pub fn key_material_len(self) -> usize {
        let iters = self.iterations();
        (BLOCK_LEN + 16 * (iters - 1)) + 24 * iters + 64 * iters + 4 * iters
    }
}

/// A UHASH tag of 4, 8, 12 or 16 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UhashTag {
    bytes: [u8; MAX_TAG_LEN],
    len: usize,
}

impl UhashTag {
    fn zeroed(kind: UhashType) -> Self {
        Self { bytes: [0; MAX_TAG_LEN], len: kind.tag_len() }
    }

    fn set_word(&mut self, iteration: usize, word: u32) {
        self.bytes[4 * iteration..4 * iteration + 4].copy_from_slice(&word.to_be_bytes());
    }

    /// Tag bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Tag length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; tags have at least one word.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Compare against `other` without stopping at the first difference.
    pub fn verify(&self, other: &[u8]) -> bool {
        if other.len() != self.len {
            return false;
        }
        self.as_bytes().iter().zip(other).fold(0u8, |diff, (a, b)| diff | (a ^ b)) == 0
    }
}

impl AsRef<[u8]> for UhashTag {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for UhashTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("UhashTag(")?;
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        f.write_str(")")
    }
}
