//! Streamlock Cryptographic Primitives
//!
//! Four software stream ciphers, a buffered adapter that turns their
//! fixed-size keystream chunks into an arbitrary-length byte stream, and the
//! UMAC universal hash family keyed from that stream.
//!
//! # Keystream Pipeline
//!
//! Every cipher produces keystream in chunks of a fixed size (4 bytes for
//! HC-128, 16 for Rabbit and Sosemanuk, 64 for Salsa20). The buffered
//! adapter serves requests of any length from those chunks and never
//! computes a chunk it does not hand out.
//!
//! ```text
//! key ──> CipherKey ──(iv)──> session: Keystream
//!                                   │  chunk_size() bytes per call
//!                                   ▼
//!                             BufferedCipher
//!                        extract / apply_keystream / skip
//!                                   │
//!                   ┌───────────────┴───────────────┐
//!                   ▼                               ▼
//!            encrypt/decrypt                  UhashKey::derive
//!                                                   │
//!                                                   ▼
//!                                     UhashState::update / finish
//! ```
//!
//! # Security
//!
//! Keystream reuse:
//! - A (key, IV) pair must never encrypt two different messages
//! - Key setup is separated from IV setup so one key can serve many IVs
//!
//! Memory hygiene:
//! - Cipher states, expanded keys, buffered keystream and UMAC keys are
//!   zeroized on drop
//!
//! Authentication:
//! - UHASH alone is not a MAC; its output must be encrypted or masked
//! - Tag comparison does not short-circuit on the first differing byte

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bits;
pub mod buffered;
pub mod ciphers;
pub mod error;
pub mod keystream;
pub mod umac;

pub use buffered::BufferedCipher;
pub use ciphers::{
    CipherKind, DynKeystream, Hc128, Hc128Key, Rabbit, RabbitKey, Salsa20, Salsa20Key,
    Salsa20Variant, Sosemanuk, SosemanukKey,
};
pub use error::KeyError;
pub use keystream::{Keystream, MAX_CHUNK_SIZE, SeekableKeystream};
pub use umac::{MAX_TAG_LEN, UhashKey, UhashState, UhashTag, UhashType};
