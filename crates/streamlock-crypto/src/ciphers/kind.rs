//! Runtime cipher selection.
//!
//! Callers that pick a cipher from configuration or a test-vector file cannot
//! use the fixed-size constructors directly. [`CipherKind`] validates key and
//! IV lengths and hands back a boxed [`Keystream`].

use std::{fmt, str::FromStr};

use super::{
    hc128::{self, Hc128Key},
    rabbit::{self, RabbitKey},
    salsa20::{self, Salsa20Key, Salsa20Variant},
    sosemanuk::{self, SosemanukKey},
};
use crate::{error::KeyError, keystream::Keystream};

/// A boxed session usable from any thread.
pub type DynKeystream = Box<dyn Keystream + Send>;

/// Every supported cipher and variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    /// HC-128.
    Hc128,
    /// Rabbit.
    Rabbit,
    /// Salsa20 with the given round count.
    Salsa20(Salsa20Variant),
    /// Sosemanuk.
    Sosemanuk,
}

impl CipherKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Hc128,
        Self::Rabbit,
        Self::Salsa20(Salsa20Variant::Salsa20_8),
        Self::Salsa20(Salsa20Variant::Salsa20_12),
        Self::Salsa20(Salsa20Variant::Salsa20_20),
        Self::Sosemanuk,
    ];

    /// Canonical lowercase name, e.g. `"salsa20/12"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hc128 => "hc-128",
            Self::Rabbit => "rabbit",
            Self::Salsa20(Salsa20Variant::Salsa20_8) => "salsa20/8",
            Self::Salsa20(Salsa20Variant::Salsa20_12) => "salsa20/12",
            Self::Salsa20(Salsa20Variant::Salsa20_20) => "salsa20/20",
            Self::Sosemanuk => "sosemanuk",
        }
    }

    /// Bytes produced per generator step.
    pub fn chunk_size(self) -> usize {
        match self {
            Self::Hc128 => hc128::CHUNK_LEN,
            Self::Rabbit => rabbit::CHUNK_LEN,
            Self::Salsa20(_) => salsa20::CHUNK_LEN,
            Self::Sosemanuk => sosemanuk::CHUNK_LEN,
        }
    }

    /// Required IV length in bytes.
    pub fn iv_len(self) -> usize {
        match self {
            Self::Hc128 => hc128::IV_LEN,
            Self::Rabbit => rabbit::IV_LEN,
            Self::Salsa20(_) => salsa20::IV_LEN,
            Self::Sosemanuk => sosemanuk::IV_LEN,
        }
    }

    /// Whether a key of `len` bytes is accepted.
    pub fn accepts_key_len(self, len: usize) -> bool {
        match self {
            Self::Hc128 => len == hc128::KEY_LEN,
            Self::Rabbit => len == rabbit::KEY_LEN,
            Self::Salsa20(_) => len == salsa20::KEY_LEN_128 || len == salsa20::KEY_LEN_256,
            Self::Sosemanuk => (1..=sosemanuk::MAX_KEY_LEN).contains(&len),
        }
    }

    /// Run key and IV setup and return the session as a boxed keystream.
    pub fn session(self, key: &[u8], iv: &[u8]) -> Result<DynKeystream, KeyError> {
        if !self.accepts_key_len(key.len()) {
            return Err(KeyError::InvalidKeyLength { cipher: self.name(), actual: key.len() });
        }
        if iv.len() != self.iv_len() {
            return Err(KeyError::InvalidIvLength {
                cipher: self.name(),
                expected: self.iv_len(),
                actual: iv.len(),
            });
        }

        // Lengths were validated above.
        let session: DynKeystream = match self {
            Self::Hc128 => {
                let (Ok(key), Ok(iv)) = (key.try_into(), iv.try_into()) else {
                    unreachable!("hc-128 lengths validated");
                };
                Box::new(Hc128Key::new(key).session(iv))
            },
            Self::Rabbit => {
                let (Ok(key), Ok(iv)) = (key.try_into(), iv.try_into()) else {
                    unreachable!("rabbit lengths validated");
                };
                Box::new(RabbitKey::new(key).session(iv))
            },
            Self::Salsa20(variant) => {
                let Ok(iv) = iv.try_into() else {
                    unreachable!("salsa20 IV length validated");
                };
                let master = if let Ok(short) = key.try_into() {
                    Salsa20Key::new_128(variant, short)
                } else if let Ok(long) = key.try_into() {
                    Salsa20Key::new_256(variant, long)
                } else {
                    unreachable!("salsa20 key length validated");
                };
                Box::new(master.session(iv))
            },
            Self::Sosemanuk => {
                let Ok(iv) = iv.try_into() else {
                    unreachable!("sosemanuk IV length validated");
                };
                Box::new(SosemanukKey::new(key).session(iv))
            },
        };
        Ok(session)
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| KeyError::UnknownCipher(s.to_string()))
    }
}
