//! Wire-Level Field Helpers
//!
//! Bounds-checked decoding of fixed-offset fields from a message payload:
//! big-endian unsigned integers (including the 48-bit timestamp), fixed-width
//! ASCII text right-trimmed of padding, single-character codes, `'Y'` boolean
//! flags, and 4-decimal fixed-point prices.
//!
//! All offsets are relative to the start of the payload, where offset 0 is
//! the message-type tag. Every accessor fails with
//! [`DecodeError::ShortPayload`] instead of panicking when the payload is
//! shorter than the requested range.

use std::ops::Range;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::records::{Side, Timestamp};

/// Implied decimal places of a wire price.
const PRICE_SCALE: u32 = 4;

/// Record-level decoding errors.
///
/// All variants are fatal for the offending record only: the record is
/// dropped and decoding resumes at the next frame boundary, since frame
/// alignment is still known.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is shorter than its message shape requires.
    #[error("payload too short: message shape needs {expected} bytes, payload has {actual}")]
    ShortPayload {
        /// Bytes the message shape requires.
        expected: usize,
        /// Bytes the payload actually has.
        actual: usize,
    },

    /// A side byte other than `'B'` or `'S'`.
    ///
    /// Rejected rather than defaulted: a wrong side corrupts downstream book
    /// reconstruction.
    #[error("invalid side byte 0x{byte:02x}, expected 'B' or 'S'")]
    InvalidSide {
        /// The offending byte.
        byte: u8,
    },

    /// A non-ASCII byte inside a fixed-width text field.
    #[error("non-ASCII byte 0x{byte:02x} in text field at offset {offset}")]
    InvalidAscii {
        /// The offending byte.
        byte: u8,
        /// Offset of the byte within the payload.
        offset: usize,
    },
}

/// A message payload with bounds-checked field accessors.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    bytes: &'a [u8],
}

impl<'a> Payload<'a> {
    /// Wrap payload bytes.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The message-type tag (first payload byte), if any.
    #[must_use]
    pub const fn tag(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    fn slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        if range.end > self.bytes.len() {
            return Err(DecodeError::ShortPayload {
                expected: range.end,
                actual: self.bytes.len(),
            });
        }
        Ok(&self.bytes[range])
    }

    /// Big-endian `u16` at a 2-byte range.
    pub fn u16_at(&self, start: usize) -> Result<u16, DecodeError> {
        let bytes = self.slice(start..start + 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Big-endian `u32` at a 4-byte range.
    pub fn u32_at(&self, start: usize) -> Result<u32, DecodeError> {
        let bytes = self.slice(start..start + 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Big-endian `u64` at an 8-byte range.
    pub fn u64_at(&self, start: usize) -> Result<u64, DecodeError> {
        let bytes = self.slice(start..start + 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    /// Big-endian 48-bit timestamp at a 6-byte range.
    pub fn timestamp_at(&self, start: usize) -> Result<Timestamp, DecodeError> {
        let bytes = self.slice(start..start + 6)?;
        let mut raw = [0u8; 8];
        raw[2..].copy_from_slice(bytes);
        Ok(Timestamp::from_nanos(u64::from_be_bytes(raw)))
    }

    /// Fixed-point price with 4 implied decimal places at a 4-byte range.
    ///
    /// Converted with decimal arithmetic; representable values decode with no
    /// rounding drift (raw `1` is exactly `0.0001`).
    pub fn price_at(&self, start: usize) -> Result<Decimal, DecodeError> {
        let raw = self.u32_at(start)?;
        Ok(Decimal::new(i64::from(raw), PRICE_SCALE))
    }

    /// Fixed-width ASCII text, trimmed of surrounding whitespace padding.
    pub fn ascii_at(&self, range: Range<usize>) -> Result<String, DecodeError> {
        let start = range.start;
        let bytes = self.slice(range)?;
        for (i, &byte) in bytes.iter().enumerate() {
            if !byte.is_ascii() {
                return Err(DecodeError::InvalidAscii {
                    byte,
                    offset: start + i,
                });
            }
        }
        let text = bytes
            .iter()
            .map(|&b| b as char)
            .collect::<String>()
            .trim()
            .to_string();
        Ok(text)
    }

    /// Single-character ASCII code field.
    pub fn char_at(&self, offset: usize) -> Result<char, DecodeError> {
        let byte = self.slice(offset..offset + 1)?[0];
        if !byte.is_ascii() {
            return Err(DecodeError::InvalidAscii { byte, offset });
        }
        Ok(byte as char)
    }

    /// Single-character boolean flag: `'Y'` is true, anything else false.
    pub fn flag_at(&self, offset: usize) -> Result<bool, DecodeError> {
        Ok(self.slice(offset..offset + 1)?[0] == b'Y')
    }

    /// Order side byte: `'B'` buy, `'S'` sell, anything else is rejected.
    pub fn side_at(&self, offset: usize) -> Result<Side, DecodeError> {
        match self.slice(offset..offset + 1)?[0] {
            b'B' => Ok(Side::Buy),
            b'S' => Ok(Side::Sell),
            byte => Err(DecodeError::InvalidSide { byte }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
