//! Seeded message workloads.
//!
//! The same seed always yields the same messages, so a failing duplex run
//! can be replayed exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use streamlock_proto::{DEFAULT_WORK_BUFFER_LEN, EARLY_TAG_THRESHOLD};

/// Message lengths every workload includes: empty, both sides of the
/// early-tag threshold and of the first two work-buffer multiples.
pub const EDGE_LENGTHS: [usize; 9] = [
    0,
    1,
    EARLY_TAG_THRESHOLD as usize,
    EARLY_TAG_THRESHOLD as usize + 1,
    DEFAULT_WORK_BUFFER_LEN - 1,
    DEFAULT_WORK_BUFFER_LEN,
    DEFAULT_WORK_BUFFER_LEN + 1,
    2 * DEFAULT_WORK_BUFFER_LEN,
    2 * DEFAULT_WORK_BUFFER_LEN + 1,
];

/// `count` random messages of up to `max_len` bytes, preceded by one
/// message for each of the [`EDGE_LENGTHS`].
pub fn messages(seed: u64, count: usize, max_len: usize) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let random_lengths: Vec<usize> = (0..count).map(|_| rng.gen_range(0..=max_len)).collect();

    EDGE_LENGTHS
        .into_iter()
        .chain(random_lengths)
        .map(|len| {
            let mut message = vec![0u8; len];
            rng.fill_bytes(&mut message);
            message
        })
        .collect()
}
