//! Padding arithmetic and bounds-checked big-endian reads.
//!
//! Every variable-length field on the wire (addresses, type tag strings,
//! string arguments, blobs) is padded with NUL bytes to the next multiple
//! of four. Fixed-size fields are big-endian. The original embedded
//! implementation walked raw pointers and relied on a final end-of-packet
//! check; here every read is bounds-checked up front so malformed input
//! can never read out of the packet.

use crate::errors::{ProtocolError, Result};

/// Round `len` up to the next multiple of 4.
pub(crate) const fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Cursor over a packet slice with OSC-specific field readers.
///
/// All readers advance the cursor on success and leave it untouched on
/// failure, so the caller's position stays meaningful for error offsets.
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        if needed > self.remaining() {
            return Err(ProtocolError::Truncated {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    /// Read a NUL-terminated string field and advance past its padding.
    ///
    /// Returns the bytes before the terminator. The cursor moves by the
    /// field's padded length, `pad4(len + 1)`, which must lie inside the
    /// packet.
    pub(crate) fn read_padded_str(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let start = self.pos;
        let len = self.buf[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtocolError::UnterminatedString { field, offset: start })?;
        let bytes = &self.buf[start..start + len];
        self.take(pad4(len + 1))?;
        Ok(bytes)
    }

    /// Skip `count` padding bytes.
    pub(crate) fn skip_padding(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Require that the whole packet has been consumed.
    pub(crate) fn finish(&self, context: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::TrailingBytes { context, remaining: self.remaining() })
        }
    }
}
