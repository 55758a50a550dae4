//! Cursor-based encoder for a single outbound packet.
//!
//! The writer is created with the exact payload size the packet will occupy.
//! It allocates the full transport buffer up front, zero-filled and padded to
//! [`FRAME_ALIGNMENT`] with [`FRAME_HEADER_RESERVE`] bytes left for the frame
//! header the transport adds. The reserved tail is never written here.
//!
//! ```text
//! [payload (size)] [reserved + padding, zeroed]   len % 8 == 0
//! ```

use crate::core::value::{
    encoded_text_len, padded_len, FRAME_ALIGNMENT, FRAME_HEADER_RESERVE, TEXT_TERMINATOR_LEN,
};
use crate::error::{constants, ProtocolError, Result};
use bytes::{Bytes, BytesMut};

#[derive(Debug)]
pub struct PacketWriter {
    buf: BytesMut,
    pos: usize,
    size: usize,
}

impl PacketWriter {
    /// Allocates a zeroed buffer for a payload of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            buf: BytesMut::zeroed(padded_len(size)),
            pos: 0,
            size,
        }
    }

    /// Encoded length of `text` as an `S` field, terminator included.
    pub fn string_len(text: &str) -> usize {
        encoded_text_len(text)
    }

    pub fn declared_size(&self) -> usize {
        self.size
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the buffer the transport receives.
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    pub fn write_i32(&mut self, value: i32) -> Result<&mut Self> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<&mut Self> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<&mut Self> {
        self.put(&value.to_le_bytes())
    }

    /// Writes a `C` field from an unsigned byte (opcodes, ids, reason codes).
    pub fn write_u8(&mut self, value: u8) -> Result<&mut Self> {
        self.put(&[value])
    }

    pub fn write_f64(&mut self, value: f64) -> Result<&mut Self> {
        self.put(&value.to_le_bytes())
    }

    /// Writes `text` as UTF-16LE followed by a zero code unit.
    ///
    /// The cursor always advances by [`PacketWriter::string_len`], so an empty
    /// string still occupies its 2-byte terminator. Text containing U+0000 is
    /// rejected with [`ProtocolError::InvalidArgument`]; the reader would stop
    /// at the first zero unit.
    pub fn write_str(&mut self, text: &str) -> Result<&mut Self> {
        if text.contains('\0') {
            return Err(ProtocolError::InvalidArgument(
                constants::ERR_TEXT_INTERIOR_NUL.to_string(),
            ));
        }
        let len = encoded_text_len(text);
        self.ensure(len)?;

        let mut at = self.pos;
        for unit in text.encode_utf16() {
            self.buf[at..at + 2].copy_from_slice(&unit.to_le_bytes());
            at += 2;
        }
        self.pos += len;
        let end = self.pos;
        self.buf[end - TEXT_TERMINATOR_LEN..end].fill(0);
        Ok(self)
    }

    /// Copies a raw block verbatim. No terminator is added or looked for.
    pub fn write_bytes(&mut self, block: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.put(block.as_ref())
    }

    /// The payload written so far, without reserved or padding bytes.
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /// Hands the finished buffer over to the caller.
    ///
    /// Fails with [`ProtocolError::SizeMismatch`] unless exactly the declared
    /// number of payload bytes was written.
    pub fn finish(self) -> Result<Bytes> {
        if self.pos != self.size {
            return Err(ProtocolError::SizeMismatch {
                declared: self.size,
                written: self.pos,
            });
        }
        debug_assert_eq!(self.buf.len() % FRAME_ALIGNMENT, 0);
        debug_assert!(self.buf.len() - self.size >= FRAME_HEADER_RESERVE);
        Ok(self.buf.freeze())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.pos + needed > self.size {
            return Err(ProtocolError::BufferOverflow {
                offset: self.pos,
                needed,
                capacity: self.size,
            });
        }
        Ok(())
    }

    fn put(&mut self, raw: &[u8]) -> Result<&mut Self> {
        self.ensure(raw.len())?;
        self.buf[self.pos..self.pos + raw.len()].copy_from_slice(raw);
        self.pos += raw.len();
        Ok(self)
    }
}
