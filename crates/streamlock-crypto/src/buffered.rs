//! Arbitrary-length keystream access on top of a chunked generator.
//!
//! Generators only produce whole chunks. [`BufferedCipher`] keeps the unused
//! tail of the most recent chunk so that any sequence of extract, XOR and
//! skip requests sees one continuous keystream, and no chunk is generated
//! more than once.
//!
//! ```text
//! request:     |--cached--|----whole chunks----|--partial--|
//! generator:   ..prev chunk][ chunk ][ chunk ][ chunk ][ chunk ]
//!                                                   ^ suffix kept in cache
//! ```
//!
//! # Invariants
//!
//! - `0 <= available < chunk_size` after every operation.
//! - Cached bytes are the last `available` bytes of the most recently
//!   generated chunk, consumed oldest-first.
//! - The logical stream position equals the total bytes extracted, XORed and
//!   skipped since construction (or since the last [`BufferedCipher::seek`]).

use zeroize::Zeroize;

use crate::{
    bits,
    keystream::{Keystream, MAX_CHUNK_SIZE, SeekableKeystream},
};

/// How freshly generated keystream is combined with the caller's buffer.
#[derive(Clone, Copy)]
enum Combine {
    /// Overwrite the buffer with keystream.
    Copy,
    /// XOR keystream into the buffer.
    Xor,
}

impl Combine {
    fn apply(self, dst: &mut [u8], keystream: &[u8]) {
        match self {
            Self::Copy => dst.copy_from_slice(keystream),
            Self::Xor => bits::xor_in_place(dst, keystream),
        }
    }
}

/// A keystream generator with a carry-over cache.
pub struct BufferedCipher<K: Keystream> {
    inner: K,
    cache: [u8; MAX_CHUNK_SIZE],
    /// Valid bytes at the end of `cache[..chunk_size]`.
    available: usize,
}

impl<K: Keystream> BufferedCipher<K> {
    /// Wrap a freshly initialized session.
    pub fn new(inner: K) -> Self {
        let chunk = inner.chunk_size();
        debug_assert!(
            (1..=MAX_CHUNK_SIZE).contains(&chunk),
            "chunk size {chunk} outside 1..={MAX_CHUNK_SIZE}"
        );
        Self { inner, cache: [0; MAX_CHUNK_SIZE], available: 0 }
    }

    /// Number of cached keystream bytes not yet consumed.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Borrow the underlying generator.
    pub fn get_ref(&self) -> &K {
        &self.inner
    }

    /// Fill `out` with the next `out.len()` keystream bytes.
    pub fn extract(&mut self, out: &mut [u8]) {
        self.process(out, Combine::Copy);
    }

    /// XOR the next `buf.len()` keystream bytes into `buf`.
    ///
    /// Encryption and decryption are the same operation.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        self.process(buf, Combine::Xor);
    }

    /// Advance the keystream by `len` bytes without producing output.
    ///
    /// Generators without random access still compute every skipped chunk.
    pub fn skip(&mut self, len: u64) {
        let available = self.available as u64;
        if len <= available {
            self.available -= len as usize;
            return;
        }

        let chunk = self.inner.chunk_size();
        let remaining = len - available;
        self.available = 0;

        let whole = remaining / chunk as u64;
        let partial = (remaining % chunk as u64) as usize;
        for _ in 0..whole {
            self.inner.extract_chunk(&mut self.cache[..chunk]);
        }
        if partial > 0 {
            self.inner.extract_chunk(&mut self.cache[..chunk]);
            self.available = chunk - partial;
        }
    }

    fn process(&mut self, buf: &mut [u8], combine: Combine) {
        let chunk = self.inner.chunk_size();

        // Oldest cached bytes first.
        let from_cache = self.available.min(buf.len());
        let (head, rest) = buf.split_at_mut(from_cache);
        if from_cache > 0 {
            let start = chunk - self.available;
            combine.apply(head, &self.cache[start..start + from_cache]);
            self.available -= from_cache;
        }
        if rest.is_empty() {
            return;
        }
        debug_assert_eq!(self.available, 0);

        let mut whole = rest.chunks_exact_mut(chunk);
        for block in &mut whole {
            match combine {
                Combine::Copy => self.inner.extract_chunk(block),
                Combine::Xor => {
                    self.inner.extract_chunk(&mut self.cache[..chunk]);
                    bits::xor_in_place(block, &self.cache[..chunk]);
                },
            }
        }

        let tail = whole.into_remainder();
        if !tail.is_empty() {
            self.inner.extract_chunk(&mut self.cache[..chunk]);
            combine.apply(tail, &self.cache[..tail.len()]);
            self.available = chunk - tail.len();
        }
    }
}

impl<K: SeekableKeystream> BufferedCipher<K> {
    /// Reposition the keystream at absolute byte `offset`.
    ///
    /// The cache is discarded; if `offset` falls inside a chunk, that chunk
    /// is regenerated and its remaining bytes cached.
    pub fn seek(&mut self, offset: u64) {
        let chunk = self.inner.chunk_size() as u64;
        self.inner.seek_chunk(offset / chunk);
        self.available = 0;
        self.skip(offset % chunk);
    }

    /// Absolute byte offset of the next keystream byte.
    pub fn position(&self) -> u64 {
        let chunk = self.inner.chunk_size() as u64;
        self.inner.chunk_position() * chunk - self.available as u64
    }
}

impl<K: Keystream> Drop for BufferedCipher<K> {
    fn drop(&mut self) {
        self.cache.zeroize();
    }
}
