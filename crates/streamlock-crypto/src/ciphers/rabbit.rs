//! Rabbit (RFC 4503, eSTREAM software portfolio).
//!
//! 128-bit key, 64-bit IV, 128 bits of output per round. The state is eight
//! 32-bit state words, eight 32-bit counters and a single carry bit. Key setup
//! produces a master state which can either be used directly or combined with
//! an IV to produce independent sessions.

use zeroize::Zeroize;

use crate::{bits, keystream::Keystream};

/// Key length in bytes.
pub const KEY_LEN: usize = 16;

/// IV length in bytes.
pub const IV_LEN: usize = 8;

/// Bytes produced per round.
pub const CHUNK_LEN: usize = 16;

/// Counter increments, added with carry on every round.
const A: [u32; 8] = [
    0x4D34_D34D,
    0xD34D_34D3,
    0x34D3_4D34,
    0x4D34_D34D,
    0xD34D_34D3,
    0x34D3_4D34,
    0x4D34_D34D,
    0xD34D_34D3,
];

/// Square `u + v` as a 64-bit value and fold the halves.
fn g(u: u32, v: u32) -> u32 {
    let sum = u64::from(u.wrapping_add(v));
    let square = sum * sum;
    ((square >> 32) as u32) ^ (square as u32)
}

fn concat16(hi: u16, lo: u16) -> u32 {
    (u32::from(hi) << 16) | u32::from(lo)
}

/// Registers shared by master and session states.
#[derive(Clone)]
struct Core {
    x: [u32; 8],
    c: [u32; 8],
    carry: bool,
}

impl Core {
    /// Counter update followed by the next-state function.
    fn round(&mut self) {
        let mut carry = u64::from(self.carry);
        for (c, a) in self.c.iter_mut().zip(A) {
            let sum = u64::from(*c) + u64::from(a) + carry;
            *c = sum as u32;
            carry = sum >> 32;
        }
        self.carry = carry != 0;

        let gv: [u32; 8] = core::array::from_fn(|i| g(self.x[i], self.c[i]));
        for j in 0..8 {
            let prev = gv[(j + 7) % 8];
            let prev2 = gv[(j + 6) % 8];
            self.x[j] = if j % 2 == 0 {
                gv[j].wrapping_add(prev.rotate_left(16)).wrapping_add(prev2.rotate_left(16))
            } else {
                gv[j].wrapping_add(prev.rotate_left(8)).wrapping_add(prev2)
            };
        }
    }

    fn extract(&mut self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), CHUNK_LEN);
        self.round();

        let x = &self.x;
        let lo = |w: u32| w as u16;
        let hi = |w: u32| (w >> 16) as u16;
        let words: [u16; 8] = [
            lo(x[0]) ^ hi(x[5]),
            hi(x[0]) ^ lo(x[3]),
            lo(x[2]) ^ hi(x[7]),
            hi(x[2]) ^ lo(x[5]),
            lo(x[4]) ^ hi(x[1]),
            hi(x[4]) ^ lo(x[7]),
            lo(x[6]) ^ hi(x[3]),
            hi(x[6]) ^ lo(x[1]),
        ];
        for (chunk, word) in out.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        self.x.zeroize();
        self.c.zeroize();
        self.carry = false;
    }
}

/// Rabbit master state, derived from the key alone.
#[derive(Clone)]
pub struct RabbitKey {
    core: Core,
}

impl RabbitKey {
    /// Run the key setup for a 128-bit key.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let k: [u16; 8] = core::array::from_fn(|i| u16::from_le_bytes([key[2 * i], key[2 * i + 1]]));

        let mut core = Core { x: [0; 8], c: [0; 8], carry: false };
        for i in 0..8 {
            if i % 2 == 1 {
                core.x[i] = concat16(k[(i + 5) % 8], k[(i + 4) % 8]);
                core.c[i] = concat16(k[i], k[(i + 1) % 8]);
            } else {
                core.x[i] = concat16(k[(i + 1) % 8], k[i]);
                core.c[i] = concat16(k[(i + 4) % 8], k[(i + 5) % 8]);
            }
        }

        for _ in 0..4 {
            core.round();
        }
        for i in 0..8 {
            core.c[i] ^= core.x[(i + 4) % 8];
        }

        Self { core }
    }

    /// Derive a session for `iv`.
    ///
    /// The same IV must never be used twice with the same key.
    pub fn session(&self, iv: &[u8; IV_LEN]) -> Rabbit {
        let mut core = self.core.clone();

        let iv32: [u32; 2] = bits::words_le(iv);
        let iv16: [u16; 4] = core::array::from_fn(|i| u16::from_le_bytes([iv[2 * i], iv[2 * i + 1]]));
        let odd_halves = concat16(iv16[3], iv16[1]);
        let even_halves = concat16(iv16[2], iv16[0]);
        let mask = [iv32[0], odd_halves, iv32[1], even_halves];

        for (i, c) in core.c.iter_mut().enumerate() {
            *c ^= mask[i % 4];
        }
        for _ in 0..4 {
            core.round();
        }

        Rabbit { core }
    }

    /// Use the master state directly as a keystream, without an IV.
    pub fn without_iv(&self) -> Rabbit {
        Rabbit { core: self.core.clone() }
    }
}

/// Rabbit session state.
#[derive(Clone)]
pub struct Rabbit {
    core: Core,
}

impl Rabbit {
    /// Build a session directly from key and IV.
    pub fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        RabbitKey::new(key).session(iv)
    }
}

impl Keystream for Rabbit {
    fn chunk_size(&self) -> usize {
        CHUNK_LEN
    }

    fn extract_chunk(&mut self, out: &mut [u8]) {
        self.core.extract(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystream(session: &mut Rabbit, len: usize) -> String {
        let mut out = vec![0u8; len];
        for chunk in out.chunks_exact_mut(CHUNK_LEN) {
            session.extract_chunk(chunk);
        }
        hex::encode(out)
    }

    #[test]
    fn zero_key_without_iv() {
        let mut session = RabbitKey::new(&[0u8; 16]).without_iv();
        assert_eq!(
            keystream(&mut session, 48),
            "02f74a1c26456bf5ecd6a536f05457b1a78ac689476c697b390c9cc515d8e888\
             96d6731688d168da51d40c70c3a116f4"
        );
    }

    #[test]
    fn rfc_key_without_iv() {
        let key: [u8; 16] = [
            0x91, 0x28, 0x13, 0x29, 0x2E, 0x3D, 0x36, 0xFE, 0x3B, 0xFC, 0x62, 0xF1, 0xDC, 0x51,
            0xC3, 0xAC,
        ];
        let mut session = RabbitKey::new(&key).without_iv();
        assert_eq!(
            keystream(&mut session, 48),
            "73751e3eea66556153200726b21ccdd41a2fe2889a4fd7cd180f898aadd92015\
             a9e61c96fa94458063de43dd92d4f029"
        );
    }

    #[test]
    fn zero_key_zero_iv() {
        let mut session = Rabbit::new(&[0u8; 16], &[0u8; 8]);
        assert_eq!(
            keystream(&mut session, 64),
            "edb70567375dcd7cd89554f85e27a7c68d4adc7032298f7bd4eff504aca6295f\
             668fbf478adb2be51e6cde292b82de2ab48d2ac6565979220ec909a7e7576098"
        );
    }

    #[test]
    fn zero_key_with_iv() {
        let iv = [0x27, 0x17, 0xF4, 0xD2, 0x1A, 0x56, 0xEB, 0xA6];
        let mut session = Rabbit::new(&[0u8; 16], &iv);
        assert_eq!(
            keystream(&mut session, 48),
            "4d1051a123afb670bf8d8505c8d85a44035bc3acc667aeae5b2cf44779f2c896\
             cb5115f034f03d31171ca75f89fccb9f"
        );
    }

    #[test]
    fn single_bit_key_zero_iv() {
        let mut key = [0u8; 16];
        key[0] = 0x80;
        let mut session = Rabbit::new(&key, &[0u8; 8]);
        assert_eq!(
            keystream(&mut session, 64),
            "dcdcb614f738a20ce103637e58091766010b16eacd06a9108671b1eeefe8cc17\
             2ec9402dd54c53079767a6299561ee5066a5dd404c4d6875f4b5d611b007b106"
        );
    }

    #[test]
    fn master_state_is_reusable() {
        let master = RabbitKey::new(&[3u8; 16]);
        let first = keystream(&mut master.session(&[1u8; 8]), 32);
        let _other = keystream(&mut master.session(&[2u8; 8]), 32);
        assert_eq!(first, keystream(&mut master.session(&[1u8; 8]), 32));
    }
}
