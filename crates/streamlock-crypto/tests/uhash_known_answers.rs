//! Known-answer tests for UHASH keyed from Salsa20/20
//!
//! The key is drawn from Salsa20/20 with key `80 00 .. 00` and a zero IV.
//! Messages are the ramp `m[i] = 7i + 3 (mod 256)`. The lengths straddle the
//! L1 block size, the L2 skip and the POLY64 to POLY128 switch at 2^24 bytes.

use streamlock_crypto::{
    BufferedCipher, Salsa20Key, Salsa20Variant, UhashKey, UhashState, UhashType,
};

fn key(kind: UhashType) -> UhashKey {
    let mut key = [0u8; 16];
    key[0] = 0x80;
    let session = Salsa20Key::new_128(Salsa20Variant::Salsa20_20, &key).session(&[0u8; 8]);
    UhashKey::derive(kind, &mut BufferedCipher::new(session))
}

fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

fn check(kind: UhashType, cases: &[(&[u8], &str)]) {
    let key = key(kind);
    for (message, want) in cases {
        assert_eq!(hex::encode(key.hash(message)), *want, "{kind:?}, {} bytes", message.len());
    }
}

#[test]
fn short_messages_all_widths() {
    let (r1024, r1025, r1500, r5000) = (ramp(1024), ramp(1025), ramp(1500), ramp(5000));
    let messages: [&[u8]; 6] = [b"", b"abc", &r1024, &r1025, &r1500, &r5000];

    let expected: [(UhashType, [&str; 6]); 4] = [
        (
            UhashType::Uhash32,
            ["e28f2ee9", "e396a038", "e71cf3a8", "5901be33", "380b161d", "1148f831"],
        ),
        (
            UhashType::Uhash64,
            [
                "fbbf98ca2a7e39ef",
                "d1e570af52f091e1",
                "a25cf48d9e0da18f",
                "a447e3f7833e23f8",
                "b19e703d07c29794",
                "81e70622fe9160c5",
            ],
        ),
        (
            UhashType::Uhash96,
            [
                "c69f6e13b6cc110139fdd945",
                "8e09806e19e057fc3990c5a0",
                "199c12b8254b917177be7bf3",
                "d49d2d3404a74035166791e6",
                "fe64a292aee95eef8abf5c0c",
                "81ca0449c3de6415fc14bb04",
            ],
        ),
        (
            UhashType::Uhash128,
            [
                "a3056692e4aea0b0029910128adb6ee3",
                "dd352da31b199b0f5dd875f6bcc4dcb9",
                "6697f03a6df2829473b80172d7b61130",
                "e5edf70afb9b391ac628b1d7ea979fa1",
                "3c8d651d4901f3f72b1dc7ec63780962",
                "56915c9a4324287ce97bb37f77b8d85f",
            ],
        ),
    ];

    for (kind, tags) in expected {
        let cases: Vec<(&[u8], &str)> = messages.iter().copied().zip(tags).collect();
        check(kind, &cases);
    }
}

#[test]
fn messages_around_polynomial_switch() {
    const BASE: usize = 1 << 24;
    let message = ramp(BASE + 5000);
    let cases: [(usize, &str); 5] = [
        (BASE, "87d53daf8b9b1c35"),
        (BASE + 1024, "2204ac119ba2d0bc"),
        (BASE + 1025, "8ed7954e1e8f4afb"),
        (BASE + 2048 + 7, "9e05bf9605430898"),
        (BASE + 5000, "2b5f6f035c52b4b3"),
    ];

    let key = key(UhashType::Uhash64);
    for (len, want) in cases {
        assert_eq!(hex::encode(key.hash(&message[..len])), want, "{len} bytes");
    }

    // Streaming across the switch in uneven pieces.
    let mut state = UhashState::new(UhashType::Uhash64);
    for piece in message.chunks(1_000_003) {
        state.update(&key, piece);
    }
    assert_eq!(hex::encode(state.finish(&key)), "2b5f6f035c52b4b3");
}

#[test]
fn single_split_near_large_boundaries_all_widths() {
    const BASE: usize = 1 << 24;
    let message = ramp(BASE + 64);
    let splits = [1 << 20, BASE - 1, BASE, BASE + 1];

    for kind in UhashType::ALL {
        let key = key(kind);
        let whole = key.hash(&message);
        for at in splits {
            let (head, tail) = message.split_at(at);
            let mut state = UhashState::new(kind);
            state.update(&key, head);
            state.update(&key, tail);
            assert_eq!(state.finish(&key), whole, "{kind:?}, split at {at}");
        }
    }
}
