//! HC-128 (eSTREAM software portfolio).
//!
//! 128-bit key, 128-bit IV, one 32-bit output word per step. The state is two
//! 512-word tables `P` and `Q`; the generator alternates 512 steps that
//! update `P` (reading `Q` through `h1`) with 512 steps that update `Q`
//! (reading `P` through `h2`).
//!
//! # Invariants
//!
//! - Table indices are always taken modulo 512 and the step counter modulo
//!   1024.
//! - All additions are modulo 2^32.

use zeroize::Zeroize;

use crate::{bits, keystream::Keystream};

/// Key length in bytes.
pub const KEY_LEN: usize = 16;

/// IV length in bytes.
pub const IV_LEN: usize = 16;

/// Bytes produced per step.
pub const CHUNK_LEN: usize = 4;

const TABLE_LEN: usize = 512;
const TABLE_MASK: usize = TABLE_LEN - 1;
const EXPANSION_LEN: usize = 1280;

fn f1(x: u32) -> u32 {
    x.rotate_left(25) ^ x.rotate_left(14) ^ (x >> 3)
}

fn f2(x: u32) -> u32 {
    x.rotate_left(15) ^ x.rotate_left(13) ^ (x >> 10)
}

fn g1(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_left(22) ^ z.rotate_left(9)).wrapping_add(y.rotate_left(24))
}

fn g2(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_left(10) ^ z.rotate_left(23)).wrapping_add(y.rotate_left(8))
}

/// Nonlinear output filter reading the opposite table.
fn h(other: &[u32; TABLE_LEN], x: u32) -> u32 {
    other[(x & 0xff) as usize].wrapping_add(other[256 + ((x >> 16) & 0xff) as usize])
}

/// One table step: update `table[i]` and return the filtered output.
fn step(
    table: &mut [u32; TABLE_LEN],
    other: &[u32; TABLE_LEN],
    g: fn(u32, u32, u32) -> u32,
    i: usize,
) -> u32 {
    let mixed = g(
        table[i.wrapping_sub(3) & TABLE_MASK],
        table[i.wrapping_sub(10) & TABLE_MASK],
        table[(i + 1) & TABLE_MASK],
    );
    table[i] = table[i].wrapping_add(mixed);
    table[i] ^ h(other, table[i.wrapping_sub(12) & TABLE_MASK])
}

/// HC-128 master key.
///
/// HC-128 has no IV-independent precomputation, so the master key only
/// retains the key words until a session is derived.
#[derive(Clone)]
pub struct Hc128Key {
    words: [u32; 4],
}

impl Hc128Key {
    /// Load a 128-bit key.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self { words: bits::words_le(key) }
    }

    /// Derive a session for `iv`.
    ///
    /// The same IV must never be used twice with the same key.
    pub fn session(&self, iv: &[u8; IV_LEN]) -> Hc128 {
        let iv_words: [u32; 4] = bits::words_le(iv);
        let mut w = [0u32; EXPANSION_LEN];
        for i in 0..4 {
            w[i] = self.words[i];
            w[i + 4] = self.words[i];
            w[i + 8] = iv_words[i];
            w[i + 12] = iv_words[i];
        }
        for i in 16..EXPANSION_LEN {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(i as u32);
        }

        let mut p = [0u32; TABLE_LEN];
        let mut q = [0u32; TABLE_LEN];
        p.copy_from_slice(&w[256..768]);
        q.copy_from_slice(&w[768..1280]);
        w.zeroize();

        // Run both tables through a full cycle, discarding the output.
        for i in 0..TABLE_LEN {
            p[i] = step(&mut p, &q, g1, i);
        }
        for i in 0..TABLE_LEN {
            q[i] = step(&mut q, &p, g2, i);
        }

        Hc128 { p, q, counter: 0 }
    }
}

impl Drop for Hc128Key {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

/// HC-128 session state.
#[derive(Clone)]
pub struct Hc128 {
    p: [u32; TABLE_LEN],
    q: [u32; TABLE_LEN],
    /// Step counter in `0..1024`; below 512 updates `P`, otherwise `Q`.
    counter: usize,
}

impl Hc128 {
    /// Build a session directly from key and IV.
    pub fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        Hc128Key::new(key).session(iv)
    }

    /// Produce the next 32-bit keystream word.
    pub fn next_word(&mut self) -> u32 {
        let i = self.counter;
        self.counter = (i + 1) & 1023;
        if i < TABLE_LEN {
            step(&mut self.p, &self.q, g1, i)
        } else {
            step(&mut self.q, &self.p, g2, i & TABLE_MASK)
        }
    }
}

impl Keystream for Hc128 {
    fn chunk_size(&self) -> usize {
        CHUNK_LEN
    }

    fn extract_chunk(&mut self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), CHUNK_LEN);
        out.copy_from_slice(&self.next_word().to_le_bytes());
    }
}

impl Drop for Hc128 {
    fn drop(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystream(session: &mut Hc128, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        for chunk in out.chunks_exact_mut(CHUNK_LEN) {
            session.extract_chunk(chunk);
        }
        out
    }

    #[test]
    fn zero_key_zero_iv() {
        let mut session = Hc128::new(&[0u8; 16], &[0u8; 16]);
        assert_eq!(
            hex::encode(keystream(&mut session, 64)),
            "82001573a003fd3b7fd72ffb0eaf63aac62f12deb629dca72785a66268ec758b\
             1edb36900560898178e0ad009abf1f491330dc1c246e3d6cb264f6900271d59c"
        );
    }

    #[test]
    fn single_bit_key() {
        let mut key = [0u8; 16];
        key[0] = 0x80;
        let mut session = Hc128::new(&key, &[0u8; 16]);
        assert_eq!(
            hex::encode(keystream(&mut session, 64)),
            "378602b98f32a74847515654ae0de7ed8f72bc34776a065103e51595521ffe47\
             f9af0a4cb47999cfa26d33bf809545989d53debfe7a9efd8b9109ca6efaddf83"
        );
    }

    #[test]
    fn sequential_key_and_iv_across_table_switches() {
        let key: [u8; 16] = core::array::from_fn(|i| i as u8);
        let iv: [u8; 16] = core::array::from_fn(|i| 0xf0 + i as u8);
        let mut session = Hc128::new(&key, &iv);

        let head = keystream(&mut session, 64);
        assert_eq!(
            hex::encode(&head),
            "712d88c0cc04751a52c6fcac040c823a542a4e7c464ec07326072ab58bc39a0f\
             6c29ca33a9bd2fc0d4256804d606b80d03d60b48c610c3e9177d2af24ad0efea"
        );

        // Offset 6144 lies past several P/Q alternations.
        for _ in 0..(6144 - 64) / CHUNK_LEN {
            session.next_word();
        }
        assert_eq!(
            hex::encode(keystream(&mut session, 64)),
            "3a448d7a7fa79f55f721c9b2bbbafd18a90d9552a87e46564b80728581b00aa5\
             c5d6395b37620b6cc658f63124d93314f9ec1e67350b3d525d33a18cc369f685"
        );
    }

    #[test]
    fn sessions_from_one_key_are_independent() {
        let master = Hc128Key::new(&[7u8; 16]);
        let mut a = master.session(&[0u8; 16]);
        let mut b = master.session(&[1u8; 16]);
        let mut a2 = master.session(&[0u8; 16]);

        let ka = keystream(&mut a, 32);
        assert_ne!(ka, keystream(&mut b, 32));
        assert_eq!(ka, keystream(&mut a2, 32));
    }
}
