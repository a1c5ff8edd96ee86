//! Streamlock Channel Protocol
//!
//! Sends and receives length-prefixed messages over any `Read`/`Write`
//! byte stream. Every byte after the connection starts is encrypted with a
//! stream cipher, and every frame is authenticated with UMAC.
//!
//! # Frame Lifecycle
//!
//! ```text
//! sender                                    receiver
//!   │ length ──> MAC ──> early tag (>1024)    │
//!   │ MAC restarts over length, tag, payload  │
//!   │ encrypt in 4096-byte chunks ──────────> │ decrypt length, check early tag
//!   │                                         │ allocate exactly `length`
//!   │ final tag (encrypted) ────────────────> │ decrypt + MAC chunks, verify
//! ```
//!
//! One [`SignedChannel`] handles one direction. A duplex connection uses two,
//! with independent IVs, typically owned by separate threads.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod channel;
pub mod config;
pub mod error;
pub mod frame;

pub use channel::SignedChannel;
pub use config::{ChannelConfig, DEFAULT_MAX_MESSAGE_LEN, MIN_WORK_BUFFER_LEN};
pub use error::{ChannelError, TagStage};
pub use frame::{DEFAULT_WORK_BUFFER_LEN, EARLY_TAG_THRESHOLD, LENGTH_PREFIX_LEN, frame_len};
