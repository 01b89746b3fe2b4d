//! Primitive encoding/decoding shared by every binary format in the crate.
//!
//! Implements bounded reading and growable writing of varints, raw byte runs,
//! length-prefixed byte runs and fixed-width big-endian integers.

use crate::codec::varint;
use crate::error::VarintError;
use crate::limits::MAX_VARINT_BYTES;

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at `offset`.
    ///
    /// An offset past the end behaves like an exhausted reader.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the bytes consumed since position `start`.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, VarintError> {
        if self.pos >= self.data.len() {
            return Err(VarintError::Truncated { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], VarintError> {
        if n > self.remaining_len() {
            return Err(VarintError::Truncated { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned varint (MSB continuation, least-significant group first).
    ///
    /// At most [`MAX_VARINT_BYTES`] bytes are consumed; nine groups of seven
    /// bits cannot overflow a `u64`. A zero final byte after a continuation
    /// byte is padding and is rejected, so every value has one encoding.
    #[inline]
    pub fn read_varint(&mut self, context: &'static str) -> Result<u64, VarintError> {
        let mut result: u64 = 0;

        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            result |= u64::from(byte & 0x7F) << (7 * i);

            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(VarintError::NonMinimal { context });
                }
                return Ok(result);
            }
        }

        Err(VarintError::Overlong { context })
    }

    /// Reads a varint length prefix followed by that many bytes.
    ///
    /// Returns `Ok(Err(len))` when the declared length exceeds `max_len`, so
    /// callers can report the limit violation with their own error type.
    pub fn read_prefixed(
        &mut self,
        max_len: usize,
        context: &'static str,
    ) -> Result<Result<&'a [u8], usize>, VarintError> {
        let len = self.read_varint(context)?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        if len > max_len {
            return Ok(Err(len));
        }
        self.read_bytes(len, context).map(Ok)
    }

    /// Reads a big-endian unsigned integer of `width` bytes (at most 8).
    pub fn read_uint_be(
        &mut self,
        width: usize,
        context: &'static str,
    ) -> Result<u64, VarintError> {
        let bytes = self.read_bytes(width, context)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned varint.
    #[inline]
    pub fn write_varint(&mut self, value: u64) -> Result<(), VarintError> {
        // Stack buffer batches the writes (faster than multiple push calls)
        let mut buf = [0u8; MAX_VARINT_BYTES];
        let len = varint::encode_into(value, &mut buf)?;
        self.buf.extend_from_slice(&buf[..len]);
        Ok(())
    }

    /// Writes a varint length prefix followed by the bytes.
    pub fn write_prefixed(&mut self, bytes: &[u8]) -> Result<(), VarintError> {
        self.write_varint(bytes.len() as u64)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes the low `width` bytes of `value` big-endian (width at most 8).
    pub fn write_uint_be(&mut self, value: u64, width: usize) {
        let bytes = value.to_be_bytes();
        self.buf.extend_from_slice(&bytes[bytes.len() - width..]);
    }
}
