//! Length-prefixed byte frames whose size is only known after the payload
//! has been written.
//!
//! A [`LengthPrefixedBuffer`] reserves [`SIZE_MARK`] bytes at the front of its
//! storage, accepts payload bytes, and patches the reserved bytes with the
//! big-endian payload length once [`LengthPrefixedBuffer::sync_length_prefix`]
//! runs. [`LengthPrefixedBuffer::finish`] hands back an immutable
//! [`SizedFrame`] that can be written to any sink.

mod buffer;
mod codec;
mod frame;
mod wrapper;
mod writer;

pub use buffer::*;
pub use codec::*;
pub use frame::*;
pub use wrapper::*;
pub use writer::*;
