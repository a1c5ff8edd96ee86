//! Stream cipher engines.
//!
//! Every cipher follows the same three-stage lifecycle:
//!
//! ```text
//! secret key ──> XKey::new (master, reusable)
//!                   │
//!                   ▼
//!      iv ──> XKey::session ──> session (implements Keystream)
//!                                   │
//!                                   ▼
//!                           BufferedCipher<session>
//! ```
//!
//! Master and session states zeroize their registers on drop.

pub mod hc128;
pub mod kind;
pub mod rabbit;
pub mod salsa20;
mod serpent;
pub mod sosemanuk;

pub use hc128::{Hc128, Hc128Key};
pub use kind::{CipherKind, DynKeystream};
pub use rabbit::{Rabbit, RabbitKey};
pub use salsa20::{Salsa20, Salsa20Key, Salsa20Variant};
pub use sosemanuk::{Sosemanuk, SosemanukKey};
