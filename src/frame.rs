use crate::buffer::{LengthPrefixedBuffer, OverflowPolicy};
use crate::codec::{decode_i32, SIZE_MARK};
use crate::wrapper::FrameWrapper;
use std::io;

/// A finished frame: synced length prefix followed by the payload.
///
/// Obtained from [`LengthPrefixedBuffer::finish`]; no further appends are
/// possible without reopening it through [`into_buffer`](Self::into_buffer).
#[derive(Debug, Clone)]
pub struct SizedFrame {
    bytes: Vec<u8>,
    overflow: OverflowPolicy,
}

impl PartialEq for SizedFrame {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for SizedFrame {}

impl AsRef<[u8]> for SizedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl FrameWrapper<Vec<u8>> for SizedFrame {
    fn into_inner(self) -> Vec<u8> {
        self.into_vec()
    }
}

impl SizedFrame {
    pub(crate) fn from_synced(bytes: Vec<u8>, overflow: OverflowPolicy) -> Self {
        Self { bytes, overflow }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[SIZE_MARK..]
    }

    pub fn payload_len(&self) -> usize {
        self.bytes.len() - SIZE_MARK
    }

    /// The prefix as written on the wire. Only differs from `payload_len` when
    /// the frame was built under [`OverflowPolicy::Wrap`].
    pub fn length_prefix(&self) -> i32 {
        let mut prefix = [0u8; SIZE_MARK];
        prefix.copy_from_slice(&self.bytes[..SIZE_MARK]);
        decode_i32(prefix)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Reopen the frame for more appends. The returned buffer is unsynced.
    pub fn into_buffer(self) -> LengthPrefixedBuffer {
        LengthPrefixedBuffer::from_parts(self.bytes, self.overflow)
    }

    pub fn write_to<W>(&self, target: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        target.write_all(&self.bytes)
    }
}
