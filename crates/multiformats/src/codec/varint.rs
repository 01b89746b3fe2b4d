//! Unsigned varints.
//!
//! Seven payload bits per byte, least-significant group first, with the high
//! bit set on every byte except the last. Values are limited to 63 bits so
//! that no encoding exceeds nine bytes.

use crate::codec::primitives::Reader;
use crate::error::VarintError;
use crate::limits::{MAX_VARINT_BYTES, MAX_VARINT_VALUE};

/// Encodes `value` into the front of `buf`, returning the number of bytes used.
#[inline]
pub(crate) fn encode_into(
    mut value: u64,
    buf: &mut [u8; MAX_VARINT_BYTES],
) -> Result<usize, VarintError> {
    if value > MAX_VARINT_VALUE {
        return Err(VarintError::Unsupported { value });
    }
    let mut len = 0;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf[len] = byte;
            return Ok(len + 1);
        }
        buf[len] = byte | 0x80;
        len += 1;
    }
}

/// Returns the number of bytes needed to encode `value`.
///
/// Values above the 63-bit limit report the width they would need, which is
/// one more than [`MAX_VARINT_BYTES`].
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Encodes a value as a varint.
///
/// # Errors
///
/// Returns [`VarintError::Unsupported`] if the value needs more than 63 bits.
pub fn encode(value: u64) -> Result<Vec<u8>, VarintError> {
    let mut buf = [0u8; MAX_VARINT_BYTES];
    let len = encode_into(value, &mut buf)?;
    Ok(buf[..len].to_vec())
}

/// Encodes a signed value as a varint.
///
/// # Errors
///
/// Returns [`VarintError::Negative`] if the value is negative.
pub fn encode_i64(value: i64) -> Result<Vec<u8>, VarintError> {
    let value = u64::try_from(value).map_err(|_| VarintError::Negative { value })?;
    encode(value)
}

/// Decodes a varint starting at `offset`, returning the value and the number
/// of bytes read.
///
/// # Errors
///
/// Returns [`VarintError::Truncated`] if the input ends before the final byte,
/// [`VarintError::Overlong`] if no final byte appears within nine bytes and
/// [`VarintError::NonMinimal`] if the encoding carries zero padding.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u64, usize), VarintError> {
    if offset > bytes.len() {
        return Err(VarintError::Truncated { context: "varint" });
    }
    let mut reader = Reader::at(bytes, offset);
    let value = reader.read_varint("varint")?;
    Ok((value, reader.position() - offset))
}

/// Writes the varint encoding of `value` into `buffer` at `offset`, returning
/// the number of bytes written.
///
/// # Errors
///
/// Returns [`VarintError::OutOfBounds`] if the encoding does not fit and
/// [`VarintError::Unsupported`] if the value needs more than 63 bits.
pub fn write_at(value: u64, buffer: &mut [u8], offset: usize) -> Result<usize, VarintError> {
    let mut buf = [0u8; MAX_VARINT_BYTES];
    let len = encode_into(value, &mut buf)?;
    write_slice_at(&buf[..len], buffer, offset)
}

/// Copies `bytes` into `buffer` at `offset` with the same bounds contract as
/// [`write_at`].
pub(crate) fn write_slice_at(
    bytes: &[u8],
    buffer: &mut [u8],
    offset: usize,
) -> Result<usize, VarintError> {
    let end = offset.checked_add(bytes.len()).filter(|&end| end <= buffer.len());
    let Some(end) = end else {
        return Err(VarintError::OutOfBounds {
            offset,
            needed: bytes.len(),
            available: buffer.len(),
        });
    };
    buffer[offset..end].copy_from_slice(bytes);
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(0).unwrap(), vec![0x00]);
        assert_eq!(encode(1).unwrap(), vec![0x01]);
        assert_eq!(encode(127).unwrap(), vec![0x7F]);
        assert_eq!(encode(128).unwrap(), vec![0x80, 0x01]);
        assert_eq!(encode(300).unwrap(), vec![0xAC, 0x02]);
        assert_eq!(encode(16384).unwrap(), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_max_value_uses_nine_bytes() {
        let bytes = encode(MAX_VARINT_VALUE).unwrap();
        assert_eq!(bytes.len(), MAX_VARINT_BYTES);
        assert_eq!(decode(&bytes, 0).unwrap(), (MAX_VARINT_VALUE, 9));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert_eq!(encode_i64(-1), Err(VarintError::Negative { value: -1 }));
        assert_eq!(
            encode(MAX_VARINT_VALUE + 1),
            Err(VarintError::Unsupported {
                value: MAX_VARINT_VALUE + 1
            })
        );
        assert_eq!(encode_i64(300).unwrap(), vec![0xAC, 0x02]);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(127), 1);
        assert_eq!(encoded_len(128), 2);
        assert_eq!(encoded_len(MAX_VARINT_VALUE), 9);
        assert_eq!(encoded_len(u64::MAX), 10);
    }

    #[test]
    fn test_decode_at_offset() {
        let bytes = [0xFF, 0xAC, 0x02, 0x07];
        assert_eq!(decode(&bytes, 1).unwrap(), (300, 2));
        assert_eq!(decode(&bytes, 3).unwrap(), (7, 1));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(decode(&[0x80, 0x80], 0), Err(VarintError::Truncated { .. })));
        assert!(matches!(decode(&[], 0), Err(VarintError::Truncated { .. })));
        assert!(matches!(decode(&[0x01], 5), Err(VarintError::Truncated { .. })));
    }

    #[test]
    fn test_decode_overlong() {
        let bytes = [0xFFu8; 12];
        assert!(matches!(decode(&bytes, 0), Err(VarintError::Overlong { .. })));
    }

    #[test]
    fn test_decode_non_minimal() {
        assert_eq!(
            decode(&[0x81, 0x00], 0),
            Err(VarintError::NonMinimal { context: "varint" })
        );
        assert_eq!(
            decode(&[0x00, 0x81, 0x80, 0x00], 1),
            Err(VarintError::NonMinimal { context: "varint" })
        );
        assert_eq!(decode(&[0x81, 0x01], 0).unwrap(), (129, 2));
    }

    #[test]
    fn test_write_at() {
        let mut buffer = [0u8; 4];
        assert_eq!(write_at(300, &mut buffer, 1).unwrap(), 2);
        assert_eq!(buffer, [0x00, 0xAC, 0x02, 0x00]);

        assert_eq!(
            write_at(300, &mut buffer, 3),
            Err(VarintError::OutOfBounds {
                offset: 3,
                needed: 2,
                available: 4
            })
        );
        assert!(write_at(1, &mut buffer, usize::MAX).is_err());
    }
}
