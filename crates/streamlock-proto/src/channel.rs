//! One direction of an authenticated, encrypted channel.
//!
//! A [`SignedChannel`] turns messages into frames (see [`crate::frame`]) and
//! back. The sender MACs plaintext and then encrypts it; the receiver
//! decrypts and then verifies. Both ends must be built from the same key,
//! IV and MAC key, and must process the same frames in the same order.
//!
//! ```text
//! send:     plaintext ──> UHASH update ──> XOR keystream ──> write
//! receive:  read ──> XOR keystream ──> UHASH update ──> verify ──> plaintext
//! ```
//!
//! # Security
//!
//! - A frame longer than 1024 bytes is only allocated for after its early
//!   tag has been verified, and never beyond
//!   [`ChannelConfig::max_message_len`].
//! - Received plaintext is zeroized and discarded when the final tag does
//!   not verify.
//! - Tags are hidden by the cipher. Reusing a (key, IV) pair across two
//!   channels exposes both the plaintext and the MAC.
//! - After any error the channel is out of step with its peer and must be
//!   dropped.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};
use streamlock_crypto::{
    BufferedCipher, Keystream, MAX_TAG_LEN, UhashKey, UhashState, UhashType,
};
use zeroize::Zeroize;

use crate::{
    config::ChannelConfig,
    error::{ChannelError, TagStage},
    frame::{self, LENGTH_PREFIX_LEN},
};

/// Sender or receiver half of an encrypted, authenticated stream.
///
/// # Invariants
///
/// - The keystream position advances by exactly
///   [`frame::frame_len`] bytes per successful [`send`](Self::send) or
///   [`receive`](Self::receive).
/// - The MAC state is empty between frames.
pub struct SignedChannel<K: Keystream> {
    cipher: BufferedCipher<K>,
    key: UhashKey,
    mac: UhashState,
    config: ChannelConfig,
    work: BytesMut,
}

impl<K: Keystream> SignedChannel<K> {
    /// Channel with the default configuration.
    pub fn new(cipher: BufferedCipher<K>, key: UhashKey) -> Self {
        Self::with_config(cipher, key, ChannelConfig::default())
    }

    /// Channel with an explicit configuration.
    pub fn with_config(cipher: BufferedCipher<K>, key: UhashKey, config: ChannelConfig) -> Self {
        let mac = UhashState::new(key.kind());
        let work = BytesMut::with_capacity(config.effective_work_buffer_len());
        Self { cipher, key, mac, config, work }
    }

    /// Channel whose MAC key is the first keystream bytes of `cipher`.
    ///
    /// Frames are encrypted with the keystream that follows the key
    /// material.
    pub fn derive(mut cipher: BufferedCipher<K>, kind: UhashType) -> Self {
        let key = UhashKey::derive(kind, &mut cipher);
        Self::new(cipher, key)
    }

    /// Active configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Bytes per tag.
    pub fn tag_len(&self) -> usize {
        self.key.tag_len()
    }

    /// Encrypt, authenticate and write one message.
    ///
    /// The frame is produced through the work buffer: the first write
    /// carries the length prefix (and early tag) followed by as much
    /// payload as fits. The final tag rides in the last write when there is
    /// room for it and is written on its own otherwise.
    ///
    /// # Errors
    ///
    /// - `ChannelError::MessageTooLarge` if `message` is longer than
    ///   [`ChannelConfig::max_message_len`]; nothing is written
    /// - `ChannelError::Io` if the writer fails
    pub fn send<W: Write>(&mut self, io: &mut W, message: &[u8]) -> Result<(), ChannelError> {
        let max = self.config.max_message_len;
        let len = u32::try_from(message.len())
            .ok()
            .filter(|&len| len <= max)
            .ok_or(ChannelError::MessageTooLarge { len: message.len(), max })?;

        let capacity = self.config.effective_work_buffer_len();
        let tag_len = self.key.tag_len();
        let early_tag = frame::has_early_tag(len);
        tracing::debug!(len, early_tag, tag_len, "sending frame");

        self.work.clear();
        self.work.reserve(capacity);
        self.mac.reset();
        self.work.put_u32_le(len);

        if early_tag {
            self.mac.update(&self.key, &self.work);
            let tag = self.mac.finish(&self.key);
            self.work.put_slice(tag.as_bytes());
        }

        let mut rest = message;
        loop {
            let take = (capacity - self.work.len()).min(rest.len());
            self.work.put_slice(&rest[..take]);
            rest = &rest[take..];
            self.mac.update(&self.key, &self.work);
            if rest.is_empty() {
                break;
            }
            self.flush(io)?;
        }

        let tag = self.mac.finish(&self.key);
        if capacity - self.work.len() >= tag_len {
            self.work.put_slice(tag.as_bytes());
            self.flush(io)
        } else {
            self.flush(io)?;
            self.work.put_slice(tag.as_bytes());
            self.flush(io)
        }
    }

    /// Read, decrypt and verify one message.
    ///
    /// # Errors
    ///
    /// - `ChannelError::AuthenticationFailed` if the early or final tag does
    ///   not match
    /// - `ChannelError::AllocationFailed` if the announced length exceeds
    ///   [`ChannelConfig::max_message_len`] or cannot be allocated
    /// - `ChannelError::Io` if the reader fails or ends early
    pub fn receive<R: Read>(&mut self, io: &mut R) -> Result<Vec<u8>, ChannelError> {
        let tag_len = self.key.tag_len();
        self.mac.reset();

        let mut header = [0u8; LENGTH_PREFIX_LEN];
        io.read_exact(&mut header)?;
        self.cipher.apply_keystream(&mut header);
        let len = u32::from_le_bytes(header);
        self.mac.update(&self.key, &header);

        let mut tag_buf = [0u8; MAX_TAG_LEN];
        let tag = &mut tag_buf[..tag_len];

        let early_tag = frame::has_early_tag(len);
        if early_tag {
            io.read_exact(tag)?;
            self.cipher.apply_keystream(tag);
            if !self.mac.finish(&self.key).verify(tag) {
                tracing::warn!(len, "early length tag rejected");
                return Err(ChannelError::AuthenticationFailed { stage: TagStage::Length });
            }
            self.mac.update(&self.key, &header);
            self.mac.update(&self.key, tag);
        }
        tracing::debug!(len, early_tag, tag_len, "receiving frame");

        if len > self.config.max_message_len {
            tracing::warn!(len, max = self.config.max_message_len, "refusing oversized message");
            return Err(ChannelError::AllocationFailed { len });
        }
        let mut message = Vec::new();
        if message.try_reserve_exact(len as usize).is_err() {
            tracing::warn!(len, "message allocation failed");
            return Err(ChannelError::AllocationFailed { len });
        }
        message.resize(len as usize, 0);

        let chunk = self.config.effective_work_buffer_len();
        for piece in message.chunks_mut(chunk) {
            if let Err(err) = io.read_exact(piece) {
                message.zeroize();
                return Err(err.into());
            }
            self.cipher.apply_keystream(piece);
            self.mac.update(&self.key, piece);
            tracing::trace!(bytes = piece.len(), "decrypted chunk");
        }

        if let Err(err) = io.read_exact(tag) {
            message.zeroize();
            return Err(err.into());
        }
        self.cipher.apply_keystream(tag);
        if !self.mac.finish(&self.key).verify(tag) {
            tracing::warn!(len, "message tag rejected");
            message.zeroize();
            return Err(ChannelError::AuthenticationFailed { stage: TagStage::Message });
        }

        Ok(message)
    }

    /// Encrypt the work buffer in place, write it and empty it.
    fn flush<W: Write>(&mut self, io: &mut W) -> Result<(), ChannelError> {
        self.cipher.apply_keystream(&mut self.work);
        io.write_all(&self.work)?;
        tracing::trace!(bytes = self.work.len(), "wrote chunk");
        self.work.clear();
        Ok(())
    }
}
