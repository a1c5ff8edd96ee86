//! Channel configuration.

use streamlock_crypto::MAX_TAG_LEN;

use crate::frame::{DEFAULT_WORK_BUFFER_LEN, LENGTH_PREFIX_LEN};

/// Smallest usable work buffer: a length prefix and an early tag.
pub const MIN_WORK_BUFFER_LEN: usize = LENGTH_PREFIX_LEN + MAX_TAG_LEN;

/// Largest payload accepted by default.
pub const DEFAULT_MAX_MESSAGE_LEN: u32 = u32::MAX;

/// Channel configuration
///
/// The work buffer size only changes how a frame is split into writes and
/// reads; the bytes on the wire are identical for every size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Bytes encrypted and written (or read and decrypted) per I/O call.
    /// Values below [`MIN_WORK_BUFFER_LEN`] are raised to it.
    pub work_buffer_len: usize,
    /// Largest payload a sender transmits or a receiver allocates for
    pub max_message_len: u32,
}

impl ChannelConfig {
    /// Work buffer size after clamping.
    pub fn effective_work_buffer_len(&self) -> usize {
        self.work_buffer_len.max(MIN_WORK_BUFFER_LEN)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { work_buffer_len: DEFAULT_WORK_BUFFER_LEN, max_message_len: DEFAULT_MAX_MESSAGE_LEN }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_work_buffers_are_clamped() {
        let config = ChannelConfig { work_buffer_len: 1, ..ChannelConfig::default() };
        assert_eq!(config.effective_work_buffer_len(), MIN_WORK_BUFFER_LEN);
        assert_eq!(ChannelConfig::default().effective_work_buffer_len(), 4096);
    }
}
