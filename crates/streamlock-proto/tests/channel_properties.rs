//! Property-based tests for the signed channel
//!
//! These tests check the channel for arbitrary payloads and work buffer
//! sizes: messages survive a round trip, the wire bytes do not depend on how
//! the sender chunks them, and any single flipped bit is reported as an
//! authentication failure.

use proptest::prelude::*;
use streamlock_crypto::{BufferedCipher, Hc128, Hc128Key, UhashKey, UhashType};
use streamlock_proto::{ChannelConfig, SignedChannel, frame_len};

fn channel(work_buffer_len: usize) -> SignedChannel<Hc128> {
    let session = Hc128Key::new(&[0x5a; 16]).session(&[0x11; 16]);
    let config = ChannelConfig { work_buffer_len, ..ChannelConfig::default() };
    let mut cipher = BufferedCipher::new(session);
    let key = UhashKey::derive(UhashType::Uhash64, &mut cipher);
    SignedChannel::with_config(cipher, key, config)
}

fn send(work_buffer_len: usize, message: &[u8]) -> Vec<u8> {
    let mut wire = Vec::new();
    channel(work_buffer_len).send(&mut wire, message).unwrap();
    wire
}

/// Payload lengths clustered around the early-tag threshold and multiples
/// of the default work buffer.
fn interesting_len() -> impl Strategy<Value = usize> {
    prop_oneof![
        0usize..64,
        1000usize..1100,
        (1usize..4).prop_flat_map(|k| (4096 * k - 40)..(4096 * k + 8)),
        0usize..20_000,
    ]
}

proptest! {
    #[test]
    fn round_trip(len in interesting_len(), seed in any::<u8>(), work in 1usize..6000) {
        let message: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31) ^ seed).collect();
        let wire = send(work, &message);
        prop_assert_eq!(wire.len() as u64, frame_len(len as u32, 8));

        let received = channel(work).receive(&mut wire.as_slice()).unwrap();
        prop_assert_eq!(received, message);
    }

    #[test]
    fn wire_is_independent_of_work_buffer(len in interesting_len(), a in 1usize..5000, b in 1usize..5000) {
        let message = vec![0xa5u8; len];
        prop_assert_eq!(send(a, &message), send(b, &message));
    }

    #[test]
    fn single_bit_flip_is_detected(len in interesting_len(), position in any::<prop::sample::Index>(), bit in 0u8..8) {
        let message = vec![0x3cu8; len];
        let mut wire = send(4096, &message);
        let position = position.index(wire.len());
        wire[position] ^= 1 << bit;

        // Padding keeps a grown length from ending in EOF before the tag.
        wire.extend_from_slice(&[0u8; 4096]);
        let err = channel(4096).receive(&mut wire.as_slice()).unwrap_err();
        prop_assert!(err.is_authentication_failure(), "{err:?}");
    }
}

#[test]
fn messages_around_work_buffer_boundary() {
    for len in (4096 - 40)..(4096 + 40) {
        let message: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let wire = send(4096, &message);
        assert_eq!(channel(4096).receive(&mut wire.as_slice()).unwrap(), message, "{len} bytes");
    }
}
