//! Incremental UHASH state.

use zeroize::Zeroize;

use super::{
    BLOCK_LEN, MAX_ITERATIONS, UhashTag, UhashType,
    key::UhashKey,
    l3,
    nh::{self, GROUP_LEN},
    poly::Accumulator,
    uint128::U128,
};

/// Streaming UHASH computation.
///
/// Message bytes are staged in a 1024-byte block and folded into the NH
/// accumulators one 32-byte group at a time. A full block is only closed
/// (its L1 output handed to L2) once further input arrives, so
/// [`finish`](Self::finish) always sees the final block, which may be empty
/// for an empty message.
///
/// # Invariants
///
/// - `folded <= filled <= BLOCK_LEN`, and `folded` is a multiple of 32.
/// - `blocks` counts closed blocks; it is zero exactly when the message so
///   far fits in one block, in which case L2 is skipped.
/// - Splitting the input across any number of [`update`](Self::update)
///   calls gives the same tag as a single call.
#[derive(Clone)]
pub struct UhashState {
    kind: UhashType,
    block: [u8; BLOCK_LEN],
    filled: usize,
    folded: usize,
    nh: [u64; MAX_ITERATIONS],
    l2: [Accumulator; MAX_ITERATIONS],
    blocks: u64,
    message_len: u64,
}

impl UhashState {
    /// Empty state for keys of type `kind`.
    pub fn new(kind: UhashType) -> Self {
        Self {
            kind,
            block: [0; BLOCK_LEN],
            filled: 0,
            folded: 0,
            nh: [0; MAX_ITERATIONS],
            l2: [Accumulator::default(); MAX_ITERATIONS],
            blocks: 0,
            message_len: 0,
        }
    }

    /// Forget any absorbed input and start a new message.
    pub fn reset(&mut self) {
        self.block.zeroize();
        self.filled = 0;
        self.folded = 0;
        self.nh = [0; MAX_ITERATIONS];
        self.l2 = [Accumulator::default(); MAX_ITERATIONS];
        self.blocks = 0;
        self.message_len = 0;
    }

    /// Tag width this state produces.
    pub fn kind(&self) -> UhashType {
        self.kind
    }

    /// Bytes absorbed since the last reset.
    pub fn message_len(&self) -> u64 {
        self.message_len
    }

    /// Absorb `data`.
    pub fn update(&mut self, key: &UhashKey, mut data: &[u8]) {
        debug_assert_eq!(key.kind(), self.kind, "key and state widths differ");
        self.message_len += data.len() as u64;

        while !data.is_empty() {
            if self.filled == BLOCK_LEN {
                self.close_block(key);
            }
            let take = (BLOCK_LEN - self.filled).min(data.len());
            self.block[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            self.fold_groups(key);
        }
    }

    /// Produce the tag for everything absorbed and reset the state.
    pub fn finish(&mut self, key: &UhashKey) -> UhashTag {
        debug_assert_eq!(key.kind(), self.kind, "key and state widths differ");
        let iters = self.kind.iterations();

        // Zero-pad the trailing partial group.
        if self.folded < self.filled {
            let mut group = [0u8; GROUP_LEN];
            group[..self.filled - self.folded].copy_from_slice(&self.block[self.folded..self.filled]);
            self.fold_one(key, &group, self.folded);
            group.zeroize();
        }

        let bit_len = 8 * self.filled as u64;
        let total_blocks = self.blocks + 1;
        let mut tag = UhashTag::zeroed(self.kind);
        for i in 0..iters {
            let l1 = self.nh[i].wrapping_add(bit_len);
            let l2 = if self.blocks == 0 {
                U128::from_u64(l1)
            } else {
                self.l2[i].absorb(&key.l2[i], l1, total_blocks);
                self.l2[i].finish(&key.l2[i], total_blocks)
            };
            let word = l3::hash(&key.l3_mul[i], key.l3_pad[i], l2);
            tag.set_word(i, word);
        }

        self.reset();
        tag
    }

    /// Fold every complete, not yet folded group of the staging block.
    fn fold_groups(&mut self, key: &UhashKey) {
        while self.folded + GROUP_LEN <= self.filled {
            let start = self.folded;
            let mut group = [0u8; GROUP_LEN];
            group.copy_from_slice(&self.block[start..start + GROUP_LEN]);
            self.fold_one(key, &group, start);
        }
    }

    /// Add NH of `group`, found at byte `offset` of the block, to each
    /// iteration's accumulator.
    fn fold_one(&mut self, key: &UhashKey, group: &[u8; GROUP_LEN], offset: usize) {
        let word_offset = offset / 4;
        for i in 0..self.kind.iterations() {
            let key_words = &key.l1[4 * i + word_offset..];
            self.nh[i] = self.nh[i].wrapping_add(nh::group(key_words, group));
        }
        self.folded = offset + GROUP_LEN;
    }

    /// Hand a full block's L1 outputs to L2 and start the next block.
    fn close_block(&mut self, key: &UhashKey) {
        debug_assert_eq!(self.folded, BLOCK_LEN);
        self.blocks += 1;
        for i in 0..self.kind.iterations() {
            let l1 = self.nh[i].wrapping_add(8 * BLOCK_LEN as u64);
            self.l2[i].absorb(&key.l2[i], l1, self.blocks);
        }
        self.nh = [0; MAX_ITERATIONS];
        self.filled = 0;
        self.folded = 0;
    }
}

impl Drop for UhashState {
    fn drop(&mut self) {
        self.block.zeroize();
        self.nh.zeroize();
        self.l2.zeroize();
    }
}
