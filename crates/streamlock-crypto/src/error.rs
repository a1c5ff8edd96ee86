//! Errors for runtime-selected key material.
//!
//! The fixed-size constructors (`Hc128Key::new(&[u8; 16])` and friends)
//! cannot fail. Only [`CipherKind`](crate::CipherKind), which receives keys
//! and IVs as slices, reports length problems.

use thiserror::Error;

/// Key or IV rejected by [`CipherKind::session`](crate::CipherKind::session).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key length not supported by the cipher
    #[error("{cipher} does not accept a {actual}-byte key")]
    InvalidKeyLength {
        /// Cipher name
        cipher: &'static str,
        /// Length that was supplied
        actual: usize,
    },

    /// IV length differs from what the cipher requires
    #[error("{cipher} requires a {expected}-byte IV, got {actual} bytes")]
    InvalidIvLength {
        /// Cipher name
        cipher: &'static str,
        /// Required length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Name does not match any supported cipher
    #[error("unknown cipher: {0}")]
    UnknownCipher(String),
}
