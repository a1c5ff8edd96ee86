//! Chunked keystream capability shared by every cipher session.
//!
//! Each cipher produces keystream in fixed-size chunks of its own natural
//! width (4 bytes for HC-128, 16 for Rabbit and Sosemanuk, 64 for Salsa20).
//! [`BufferedCipher`](crate::BufferedCipher) turns that into arbitrary-length
//! extract/XOR/skip operations.

/// Largest chunk any generator in this crate produces.
///
/// The buffered adapter sizes its carry-over cache to this value.
pub const MAX_CHUNK_SIZE: usize = 64;

/// A keystream generator that emits one fixed-size chunk per call.
///
/// # Invariants
///
/// - `chunk_size()` is constant for the lifetime of the generator and lies in
///   `1..=MAX_CHUNK_SIZE`.
/// - Every call to `extract_chunk` advances the generator by exactly one
///   chunk. Two generators built from the same key and IV produce identical
///   sequences.
pub trait Keystream {
    /// Number of bytes written by each [`extract_chunk`](Self::extract_chunk).
    fn chunk_size(&self) -> usize;

    /// Write the next chunk into `out` and advance the generator.
    ///
    /// `out.len()` must equal [`chunk_size`](Self::chunk_size). There is no
    /// alignment requirement on `out`.
    fn extract_chunk(&mut self, out: &mut [u8]);
}

/// A generator that can jump to an arbitrary chunk index.
pub trait SeekableKeystream: Keystream {
    /// Position the generator so the next chunk produced is `chunk_index`.
    fn seek_chunk(&mut self, chunk_index: u64);

    /// Index of the next chunk the generator will produce.
    fn chunk_position(&self) -> u64;
}

impl<K: Keystream + ?Sized> Keystream for Box<K> {
    fn chunk_size(&self) -> usize {
        (**self).chunk_size()
    }

    fn extract_chunk(&mut self, out: &mut [u8]) {
        (**self).extract_chunk(out);
    }
}

impl<K: Keystream + ?Sized> Keystream for &mut K {
    fn chunk_size(&self) -> usize {
        (**self).chunk_size()
    }

    fn extract_chunk(&mut self, out: &mut [u8]) {
        (**self).extract_chunk(out);
    }
}
