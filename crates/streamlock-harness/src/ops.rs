//! Replay of buffered-adapter operation sequences against a reference.
//!
//! The reference is the session's raw chunk output, concatenated. Any
//! interleaving of extract, XOR and skip requests on a [`BufferedCipher`]
//! must observe exactly the bytes of that concatenation at the same
//! offsets. Sequences come from proptest or from fuzzer input through
//! [`arbitrary`].

use arbitrary::Arbitrary;
use streamlock_crypto::{BufferedCipher, CipherKind, DynKeystream, KeyError, Keystream};
use thiserror::Error;

/// Fill byte for XOR requests.
const XOR_FILL: u8 = 0x5a;

/// One request against the adapter. Lengths are kept small so sequences
/// cross many chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum BufferedOp {
    /// Copy keystream into a fresh buffer
    Extract(u16),
    /// XOR keystream into a buffer of `0x5a` bytes
    Xor(u16),
    /// Discard keystream
    Skip(u16),
}

impl BufferedOp {
    /// Keystream bytes consumed.
    pub fn len(self) -> usize {
        match self {
            Self::Extract(n) | Self::Xor(n) | Self::Skip(n) => usize::from(n),
        }
    }

    /// Whether the operation consumes nothing.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// A replayed operation disagreed with the reference stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation {index} ({op:?}) diverged at stream offset {offset}")]
pub struct Divergence {
    /// Position of the operation in the sequence
    pub index: usize,
    /// The operation
    pub op: BufferedOp,
    /// Stream offset where the operation started
    pub offset: usize,
}

/// Concatenate whole chunks from `session` until at least `len` bytes
/// exist, then truncate.
pub fn reference_stream<K: Keystream>(session: &mut K, len: usize) -> Vec<u8> {
    let chunk = session.chunk_size();
    let mut out = vec![0u8; len.div_ceil(chunk) * chunk];
    for block in out.chunks_exact_mut(chunk) {
        session.extract_chunk(block);
    }
    out.truncate(len);
    out
}

/// Apply `ops` to `cipher` and compare each result with `reference`, which
/// must cover the total length of `ops`.
///
/// # Errors
///
/// The first operation whose output differs from the reference.
pub fn replay<K: Keystream>(
    cipher: &mut BufferedCipher<K>,
    ops: &[BufferedOp],
    reference: &[u8],
) -> Result<(), Divergence> {
    let mut offset = 0;
    let mut buf = Vec::new();

    for (index, &op) in ops.iter().enumerate() {
        let expected = &reference[offset..offset + op.len()];
        let ok = match op {
            BufferedOp::Extract(_) => {
                buf.clear();
                buf.resize(op.len(), 0);
                cipher.extract(&mut buf);
                buf == expected
            },
            BufferedOp::Xor(_) => {
                buf.clear();
                buf.resize(op.len(), XOR_FILL);
                cipher.apply_keystream(&mut buf);
                buf.iter().zip(expected).all(|(b, k)| b ^ k == XOR_FILL)
            },
            BufferedOp::Skip(n) => {
                cipher.skip(u64::from(n));
                true
            },
        };
        if !ok {
            tracing::warn!(index, ?op, offset, "buffered operation diverged");
            return Err(Divergence { index, op, offset });
        }
        offset += op.len();
    }
    Ok(())
}

/// Why [`check`] failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// Key or IV rejected by the cipher
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Adapter output differs from the reference
    #[error(transparent)]
    Diverged(#[from] Divergence),
}

/// Build two identical sessions of `kind` from `key` and `iv`, derive the
/// reference from one and replay `ops` on the other.
///
/// # Errors
///
/// - `ReplayError::Key` if the cipher rejects `key` or `iv`
/// - `ReplayError::Diverged` for the first mismatching operation
pub fn check(kind: CipherKind, key: &[u8], iv: &[u8], ops: &[BufferedOp]) -> Result<(), ReplayError> {
    let total = ops.iter().map(|op| op.len()).sum();
    let mut reference_session: DynKeystream = kind.session(key, iv)?;
    let reference = reference_stream(&mut reference_session, total);
    let mut cipher = BufferedCipher::new(kind.session(key, iv)?);
    replay(&mut cipher, ops, &reference)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_truncated_chunk_output() {
        let mut a = CipherKind::Hc128.session(&[1; 16], &[2; 16]).unwrap();
        let mut b = CipherKind::Hc128.session(&[1; 16], &[2; 16]).unwrap();
        let short = reference_stream(&mut a, 10);
        let long = reference_stream(&mut b, 12);
        assert_eq!(short.len(), 10);
        assert_eq!(short, long[..10]);
    }

    #[test]
    fn mixed_sequence_matches() {
        let ops = [
            BufferedOp::Extract(3),
            BufferedOp::Skip(61),
            BufferedOp::Xor(130),
            BufferedOp::Extract(0),
            BufferedOp::Skip(1),
            BufferedOp::Extract(64),
        ];
        for kind in CipherKind::ALL {
            let iv = vec![9u8; kind.iv_len()];
            assert_eq!(check(kind, &[3; 16], &iv, &ops), Ok(()), "{kind}");
        }
    }

    #[test]
    fn divergence_is_reported() {
        let mut cipher =
            BufferedCipher::new(CipherKind::Rabbit.session(&[0; 16], &[0; 8]).unwrap());
        let reference = vec![0u8; 32];
        let err = replay(&mut cipher, &[BufferedOp::Skip(4), BufferedOp::Extract(4)], &reference)
            .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.offset, 4);
    }
}
