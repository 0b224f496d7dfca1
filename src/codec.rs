use thiserror::Error;

/// Width of the length prefix reserved at the front of every frame.
pub const SIZE_MARK: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("length prefix must be {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },
}

/// Serialise an `i32` as four big-endian bytes, most significant first.
///
/// Negative values keep their two's-complement bit pattern.
///
/// ```
/// use sizemark::encode_i32;
///
/// assert_eq!(encode_i32(256), [0x00, 0x00, 0x01, 0x00]);
/// assert_eq!(encode_i32(-1), [0xFF, 0xFF, 0xFF, 0xFF]);
/// ```
#[must_use]
pub fn encode_i32(value: i32) -> [u8; SIZE_MARK] {
    value.to_be_bytes()
}

/// Inverse of [`encode_i32`].
#[must_use]
pub fn decode_i32(bytes: [u8; SIZE_MARK]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// Decode a length prefix from an arbitrary slice.
///
/// # Errors
///
/// Returns [`DecodeError::BadLength`] unless `bytes` is exactly
/// [`SIZE_MARK`] bytes long.
pub fn decode_i32_slice(bytes: &[u8]) -> Result<i32, DecodeError> {
    if bytes.len() != SIZE_MARK {
        return Err(DecodeError::BadLength {
            expected: SIZE_MARK,
            actual: bytes.len(),
        });
    }

    let mut prefix = [0u8; SIZE_MARK];
    prefix.copy_from_slice(bytes);
    Ok(decode_i32(prefix))
}
