//! Channel errors.
//!
//! Any error leaves the channel's keystream and MAC positions out of step
//! with the peer. The channel must be discarded afterwards.

use std::{fmt, io};

use thiserror::Error;

/// Which tag failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStage {
    /// Early tag over the length prefix
    Length,
    /// Final tag over the whole frame
    Message,
}

impl fmt::Display for TagStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => f.write_str("length"),
            Self::Message => f.write_str("message"),
        }
    }
}

/// Errors from [`SignedChannel`](crate::SignedChannel).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Announced payload is above the configured limit or could not be
    /// allocated
    #[error("cannot allocate {len} bytes for incoming message")]
    AllocationFailed {
        /// Announced payload length
        len: u32,
    },

    /// A tag did not match; no plaintext is returned
    #[error("{stage} tag verification failed")]
    AuthenticationFailed {
        /// Tag that failed
        stage: TagStage,
    },

    /// Outgoing payload exceeds the configured limit
    #[error("message of {len} bytes exceeds maximum of {max} bytes")]
    MessageTooLarge {
        /// Payload length
        len: usize,
        /// Configured limit
        max: u32,
    },

    /// Reader or writer failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ChannelError {
    /// Returns true if a tag check failed, i.e. the peer or the transport
    /// altered the frame.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

/// Boundary conversion for callers that only speak `io::Error`.
impl From<ChannelError> for io::Error {
    fn from(err: ChannelError) -> Self {
        let kind = match err {
            ChannelError::Io(inner) => return inner,
            ChannelError::AllocationFailed { .. } => io::ErrorKind::OutOfMemory,
            ChannelError::AuthenticationFailed { .. } => io::ErrorKind::InvalidData,
            ChannelError::MessageTooLarge { .. } => io::ErrorKind::InvalidInput,
        };
        Self::new(kind, err.to_string())
    }
}
