//! Property-based replay of buffered-adapter operation sequences
//!
//! Any mix of extract, XOR and skip requests must observe the same bytes as
//! the generator's raw chunk output, for every cipher.

use proptest::prelude::*;
use streamlock_crypto::CipherKind;
use streamlock_harness::{BufferedOp, check};

fn arbitrary_kind() -> impl Strategy<Value = CipherKind> {
    prop::sample::select(CipherKind::ALL.to_vec())
}

fn arbitrary_op() -> impl Strategy<Value = BufferedOp> {
    prop_oneof![
        (0u16..200).prop_map(BufferedOp::Extract),
        (0u16..200).prop_map(BufferedOp::Xor),
        (0u16..200).prop_map(BufferedOp::Skip),
        (0u16..3000).prop_map(BufferedOp::Skip),
    ]
}

proptest! {
    #[test]
    fn any_operation_sequence_matches_reference(
        kind in arbitrary_kind(),
        key_byte in any::<u8>(),
        ops in prop::collection::vec(arbitrary_op(), 0..40),
    ) {
        let key = [key_byte; 16];
        let iv = vec![key_byte.rotate_left(3); kind.iv_len()];
        prop_assert_eq!(check(kind, &key, &iv, &ops), Ok(()));
    }
}

#[test]
fn request_sizes_cycling_through_511() {
    // 1, 2, ..., 511, 1, 2, ... for roughly 250 KB.
    let ops: Vec<BufferedOp> = (0..1000).map(|i| BufferedOp::Extract(i % 511 + 1)).collect();
    for kind in CipherKind::ALL {
        let iv = vec![0u8; kind.iv_len()];
        assert_eq!(check(kind, &[0x80; 16], &iv, &ops), Ok(()), "{kind}");
    }
}
