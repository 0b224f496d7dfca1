use crate::codec::{encode_i32, SIZE_MARK};
use crate::frame::SizedFrame;
use crate::wrapper::FrameIo;
use std::convert::TryFrom;
use std::io;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// What to do when a payload is too long for a signed 32-bit length prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Refuse to sync the prefix and report [`FrameError::PayloadTooLarge`].
    Reject,
    /// Keep the low 32 bits of the length, two's-complement style.
    Wrap,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Reject
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("payload of {len} bytes does not fit in a signed 32-bit length prefix")]
    PayloadTooLarge { len: usize },
    #[error("frame bytes were read before the length prefix was synced")]
    NotSynced,
}

pub type FrameResult<T> = Result<T, FrameError>;

/// Encode a payload length as the 4-byte prefix, applying `policy` when the
/// length exceeds `i32::MAX`.
///
/// # Errors
///
/// Returns [`FrameError::PayloadTooLarge`] for an oversized `len` under
/// [`OverflowPolicy::Reject`].
pub fn encode_payload_len(len: usize, policy: OverflowPolicy) -> FrameResult<[u8; SIZE_MARK]> {
    match i32::try_from(len) {
        Ok(value) => Ok(encode_i32(value)),
        Err(_) => match policy {
            OverflowPolicy::Reject => {
                debug!(len, "rejecting payload too large for length prefix");
                Err(FrameError::PayloadTooLarge { len })
            }
            OverflowPolicy::Wrap => {
                let wrapped = len as u32 as i32;
                warn!(len, wrapped, "payload length wrapped in length prefix");
                Ok(encode_i32(wrapped))
            }
        },
    }
}

/// A growable byte buffer whose first [`SIZE_MARK`] bytes are reserved for
/// the big-endian length of everything appended after them.
///
/// The reserved bytes only hold a meaningful value once
/// [`sync_length_prefix`](Self::sync_length_prefix) has run after the last
/// append. Reads through [`to_bytes`](Self::to_bytes) are refused until then.
#[derive(Debug, Clone)]
pub struct LengthPrefixedBuffer {
    // storage.len() is the logical length, prefix included
    storage: Vec<u8>,
    overflow: OverflowPolicy,
    synced: bool,
}

impl Default for LengthPrefixedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameIo for LengthPrefixedBuffer {
    fn set_overflow_policy(&mut self, policy: OverflowPolicy) {
        if self.overflow != policy {
            self.overflow = policy;
            self.synced = false;
        }
    }
}

impl io::Write for LengthPrefixedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.append(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LengthPrefixedBuffer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// `capacity` is a hint; storage grows past it as needed.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, OverflowPolicy::default())
    }

    pub fn with_capacity_and_policy(capacity: usize, overflow: OverflowPolicy) -> Self {
        let mut storage = Vec::with_capacity(capacity.max(SIZE_MARK));
        storage.resize(SIZE_MARK, 0u8);
        Self::from_parts(storage, overflow)
    }

    pub(crate) fn from_parts(storage: Vec<u8>, overflow: OverflowPolicy) -> Self {
        debug_assert!(storage.len() >= SIZE_MARK);
        Self {
            storage,
            overflow,
            synced: false,
        }
    }

    pub fn append(&mut self, data: &[u8]) {
        self.storage.extend_from_slice(data);
        self.synced = false;
    }

    pub fn append_byte(&mut self, byte: u8) {
        self.storage.push(byte);
        self.synced = false;
    }

    /// Patch the reserved prefix with the current payload length.
    ///
    /// Safe to repeat; with no appends in between every call writes the same
    /// bytes. On error the prefix is left as it was and the buffer stays
    /// unsynced.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] when the payload exceeds
    /// `i32::MAX` bytes and the policy is [`OverflowPolicy::Reject`].
    pub fn sync_length_prefix(&mut self) -> FrameResult<()> {
        self.patch_prefix(self.payload_len())
    }

    fn patch_prefix(&mut self, payload_len: usize) -> FrameResult<()> {
        let prefix = match encode_payload_len(payload_len, self.overflow) {
            Ok(prefix) => prefix,
            Err(err) => {
                self.synced = false;
                return Err(err);
            }
        };

        self.storage[..SIZE_MARK].copy_from_slice(&prefix);
        self.synced = true;
        trace!(payload_len, "synced length prefix");
        Ok(())
    }

    /// The prefix followed by every appended payload byte.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NotSynced`] if bytes were appended since the last
    /// successful [`sync_length_prefix`](Self::sync_length_prefix), or it
    /// never ran.
    pub fn to_bytes(&self) -> FrameResult<&[u8]> {
        if !self.synced {
            debug!(len = self.len(), "refusing read of unsynced frame");
            return Err(FrameError::NotSynced);
        }

        Ok(&self.storage)
    }

    /// Sync the prefix and freeze the buffer into an immutable frame.
    ///
    /// # Errors
    ///
    /// Same as [`sync_length_prefix`](Self::sync_length_prefix).
    pub fn finish(mut self) -> FrameResult<SizedFrame> {
        self.sync_length_prefix()?;
        Ok(SizedFrame::from_synced(self.storage, self.overflow))
    }

    /// Drop the payload but keep the allocation.
    pub fn reset(&mut self) {
        self.storage.truncate(SIZE_MARK);
        self.synced = false;
    }

    /// Release spare capacity down to `min_capacity` (never below the
    /// current length).
    pub fn shrink_to(&mut self, min_capacity: usize) {
        self.storage.shrink_to(min_capacity.max(SIZE_MARK));
    }

    /// Logical length, reserved prefix included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn payload_len(&self) -> usize {
        self.storage.len() - SIZE_MARK
    }

    /// `true` when no payload bytes have been appended.
    pub fn is_empty(&self) -> bool {
        self.payload_len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }
}
