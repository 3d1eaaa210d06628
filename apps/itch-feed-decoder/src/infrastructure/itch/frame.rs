//! Frame Reader
//!
//! Walks a byte buffer extracting length-prefixed frames. Each frame is
//! `[u16 big-endian length][length bytes of payload]`, back to back, with no
//! magic header, trailer, or checksum. The reader never interprets payload
//! contents.
//!
//! A truncated frame (fewer than 2 bytes for the prefix, or fewer payload
//! bytes than the prefix declares) is fatal for the whole run: byte alignment
//! is unrecoverable past that point, so the error is surfaced once and the
//! reader yields nothing further. Silently stopping early would hide data
//! loss.

use thiserror::Error;

/// Frame-level errors. Always fatal for the stream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer ended in the middle of a frame.
    #[error(
        "truncated frame at byte {offset}: need {needed} more bytes, only {available} remain"
    )]
    Truncated {
        /// Byte offset of the frame's length prefix in the input buffer.
        offset: usize,
        /// Bytes the frame still required.
        needed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },
}

/// One length-prefixed unit of the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Byte offset of the frame's length prefix in the input buffer.
    pub offset: usize,
    /// Payload bytes. The first byte, when present, is the message-type tag.
    pub payload: &'a [u8],
}

/// Iterator over the frames of a byte buffer.
///
/// Terminates cleanly when the cursor reaches the buffer end. After yielding
/// a [`FrameError`] the reader is fused: the cursor position is no longer
/// trustworthy, so no further frames are produced.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    /// Current cursor position in bytes from the start of the buffer.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Result<Frame<'a>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        let offset = self.pos;
        let remaining = self.buf.len() - offset;
        if remaining < 2 {
            self.failed = true;
            return Some(Err(FrameError::Truncated {
                offset,
                needed: 2,
                available: remaining,
            }));
        }

        let length = usize::from(u16::from_be_bytes([self.buf[offset], self.buf[offset + 1]]));
        let start = offset + 2;
        let available = self.buf.len() - start;
        if available < length {
            self.failed = true;
            return Some(Err(FrameError::Truncated {
                offset,
                needed: length,
                available,
            }));
        }

        self.pos = start + length;
        Some(Ok(Frame {
            offset,
            payload: &self.buf[start..start + length],
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================
