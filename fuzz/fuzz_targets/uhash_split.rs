//! Fuzz target for UHASH fragmentation invariance
//!
//! # Invariants
//!
//! - Feeding a message through any sequence of `update` calls gives the
//!   same tag as hashing it in one call
//! - Tag length always matches the key's width

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamlock_crypto::{BufferedCipher, Rabbit, UhashKey, UhashState, UhashType};

#[derive(Debug, Arbitrary)]
struct Input {
    width: u8,
    message: Vec<u8>,
    splits: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let kind = UhashType::ALL[usize::from(input.width) % UhashType::ALL.len()];
    let key = UhashKey::derive(kind, &mut BufferedCipher::new(Rabbit::new(&[1; 16], &[2; 8])));
    let whole = key.hash(&input.message);
    assert_eq!(whole.len(), kind.tag_len());

    let mut state = UhashState::new(kind);
    let mut rest = input.message.as_slice();
    for split in input.splits {
        let (head, tail) = rest.split_at(usize::from(split).min(rest.len()));
        state.update(&key, head);
        rest = tail;
    }
    state.update(&key, rest);
    assert_eq!(state.finish(&key), whole);
});
