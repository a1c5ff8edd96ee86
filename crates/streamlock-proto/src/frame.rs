//! Wire layout of one channel frame.
//!
//! ```text
//! ┌────────────┬──────────────────────┬───────────────┬─────────────┐
//! │ length: 4  │ early tag: tag_len   │ payload: len  │ tag: tag_len│
//! │ u32 LE     │ only if len > 1024   │               │             │
//! └────────────┴──────────────────────┴───────────────┴─────────────┘
//!  └──────────────── every byte XORed with the keystream ────────────┘
//! ```
//!
//! The early tag covers the length prefix alone. The final tag covers
//! everything before it, early tag included. Both are computed over the
//! plaintext and then encrypted with the rest of the frame.

/// Bytes in the length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Payloads longer than this carry an early tag over the length prefix.
///
/// A receiver checks that tag before it allocates or waits for the payload,
/// so a corrupted length cannot stall it on data that never arrives.
pub const EARLY_TAG_THRESHOLD: u32 = 1024;

/// Default size of the buffer frames are streamed through.
pub const DEFAULT_WORK_BUFFER_LEN: usize = 4096;

/// Whether a payload of `len` bytes is preceded by an early tag.
pub fn has_early_tag(len: u32) -> bool {
    len > EARLY_TAG_THRESHOLD
}

/// Total bytes on the wire for a payload of `len` bytes with `tag_len`-byte
/// tags.
pub fn frame_len(len: u32, tag_len: usize) -> u64 {
    let early = if has_early_tag(len) { tag_len } else { 0 };
    (LENGTH_PREFIX_LEN + early + tag_len) as u64 + u64::from(len)
}
