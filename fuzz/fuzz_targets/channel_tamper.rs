//! Fuzz target for in-transit modification of a valid frame
//!
//! A genuine frame is produced, then bytes are XORed with fuzzer-chosen
//! masks at fuzzer-chosen positions.
//!
//! # Invariants
//!
//! - An unmodified frame round-trips
//! - Any non-zero modification is rejected as an authentication failure
//!   when enough trailing bytes follow for a grown length to reach a tag

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamlock_crypto::{BufferedCipher, Hc128, Hc128Key, UhashType};
use streamlock_proto::SignedChannel;

#[derive(Debug, Arbitrary)]
struct Input {
    message: Vec<u8>,
    flips: Vec<(u16, u8)>,
}

fn channel() -> SignedChannel<Hc128> {
    let session = Hc128Key::new(&[0x33; 16]).session(&[0x44; 16]);
    SignedChannel::derive(BufferedCipher::new(session), UhashType::Uhash64)
}

fuzz_target!(|input: Input| {
    let mut wire = Vec::new();
    channel().send(&mut wire, &input.message).unwrap();

    let mut modified = false;
    for (position, mask) in input.flips {
        let position = usize::from(position) % wire.len();
        wire[position] ^= mask;
        modified |= mask != 0;
    }
    // Net changes can cancel out.
    let mut pristine = Vec::new();
    channel().send(&mut pristine, &input.message).unwrap();
    let modified = modified && wire != pristine;

    wire.extend_from_slice(&[0u8; 4096]);
    let result = channel().receive(&mut wire.as_slice());
    if modified {
        let err = result.unwrap_err();
        assert!(err.is_authentication_failure(), "{err:?}");
    } else {
        assert_eq!(result.unwrap(), input.message);
    }
});
