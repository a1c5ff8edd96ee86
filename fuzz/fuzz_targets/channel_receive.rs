//! Fuzz target for SignedChannel::receive on arbitrary bytes
//!
//! # Invariants
//!
//! - Receiving never panics, whatever the wire holds
//! - Announced lengths above the configured limit fail with
//!   `AllocationFailed` instead of allocating
//! - Random bytes are never accepted as a frame (probability 2^-64)

#![no_main]

use libfuzzer_sys::fuzz_target;
use streamlock_crypto::{BufferedCipher, Salsa20Key, Salsa20Variant, UhashKey, UhashType};
use streamlock_proto::{ChannelConfig, SignedChannel};

fuzz_target!(|data: &[u8]| {
    let session = Salsa20Key::new_128(Salsa20Variant::Salsa20_8, &[7; 16]).session(&[0; 8]);
    let mut cipher = BufferedCipher::new(session);
    let key = UhashKey::derive(UhashType::Uhash64, &mut cipher);
    let config = ChannelConfig { max_message_len: 1 << 16, ..ChannelConfig::default() };
    let mut rx = SignedChannel::with_config(cipher, key, config);

    let mut reader = data;
    if let Ok(message) = rx.receive(&mut reader) {
        panic!("forged frame of {} bytes accepted", message.len());
    }
});
