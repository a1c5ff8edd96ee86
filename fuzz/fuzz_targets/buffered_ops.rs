//! Fuzz target for buffered keystream operation sequences
//!
//! # Invariants
//!
//! - Any interleaving of extract, XOR and skip observes the generator's raw
//!   chunk output at the same stream offsets, for every cipher

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamlock_crypto::CipherKind;
use streamlock_harness::{BufferedOp, check};

#[derive(Debug, Arbitrary)]
struct Input {
    cipher: u8,
    key: [u8; 16],
    iv: [u8; 16],
    ops: Vec<BufferedOp>,
}

fuzz_target!(|input: Input| {
    let kind = CipherKind::ALL[usize::from(input.cipher) % CipherKind::ALL.len()];
    let iv = &input.iv[..kind.iv_len()];
    if let Err(err) = check(kind, &input.key, iv, &input.ops) {
        panic!("{kind}: {err}");
    }
});
