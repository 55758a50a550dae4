//! Cursor-based decoder over a borrowed inbound buffer.
//!
//! Every read appends its value to the decoded sequence and advances the
//! cursor by exactly the field's width. Reads are bounds-checked; running off
//! the end of the buffer is reported as [`ProtocolError::BufferUnderrun`].
//!
//! Whether the buffer is long enough for a given message is decided by the
//! message decoder before any read, and recorded with [`PacketReader::set_valid`].

use crate::core::value::{Value, TEXT_TERMINATOR_LEN};
use crate::error::{ProtocolError, Result};
use bytes::Bytes;

#[derive(Debug)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
    values: Vec<Value>,
    valid: bool,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            values: Vec::new(),
            valid: false,
        }
    }

    /// Length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current cursor offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_i32(&mut self) -> Result<&mut Self> {
        let raw = self.take::<4>()?;
        self.values.push(Value::Int32(i32::from_le_bytes(raw)));
        Ok(self)
    }

    pub fn read_i16(&mut self) -> Result<&mut Self> {
        let raw = self.take::<2>()?;
        self.values.push(Value::Int16(i16::from_le_bytes(raw)));
        Ok(self)
    }

    pub fn read_i8(&mut self) -> Result<&mut Self> {
        let raw = self.take::<1>()?;
        self.values.push(Value::Int8(i8::from_le_bytes(raw)));
        Ok(self)
    }

    pub fn read_f64(&mut self) -> Result<&mut Self> {
        let raw = self.take::<8>()?;
        self.values.push(Value::Float64(f64::from_le_bytes(raw)));
        Ok(self)
    }

    /// Reads a null-terminated UTF-16LE string.
    ///
    /// The scan never looks past the end of the buffer. If no zero code unit is
    /// found the read fails with [`ProtocolError::UnterminatedString`] and the
    /// cursor stays where it was. Unpaired surrogates decode to U+FFFD.
    pub fn read_str(&mut self) -> Result<&mut Self> {
        let start = self.pos;
        let terminator = self.buf[start..]
            .chunks_exact(TEXT_TERMINATOR_LEN)
            .position(|unit| unit[0] == 0 && unit[1] == 0)
            .map(|units| start + units * TEXT_TERMINATOR_LEN)
            .ok_or(ProtocolError::UnterminatedString { offset: start })?;

        let units: Vec<u16> = self.buf[start..terminator]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        self.values.push(Value::Text(String::from_utf16_lossy(&units)));
        self.pos = terminator + TEXT_TERMINATOR_LEN;
        Ok(self)
    }

    /// Copies `length` raw bytes into the decoded sequence.
    pub fn read_bytes(&mut self, length: usize) -> Result<&mut Self> {
        self.ensure(length)?;
        let block = Bytes::copy_from_slice(&self.buf[self.pos..self.pos + length]);
        self.values.push(Value::Bytes(block));
        self.pos += length;
        Ok(self)
    }

    /// Records whether the buffer met the message's minimum length and
    /// returns the same flag, so it can gate the reads that follow.
    pub fn set_valid(&mut self, valid: bool) -> bool {
        self.valid = valid;
        self.valid
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Decoded values, in read order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(ProtocolError::BufferUnderrun {
                offset: self.pos,
                needed,
                available,
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian_integers() {
        let buf = [0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF, 0x80];
        let mut reader = PacketReader::new(&buf);
        reader.read_i32().unwrap().read_i16().unwrap().read_i8().unwrap();

        assert_eq!(
            reader.values(),
            &[Value::Int32(0x1234_5678), Value::Int16(-2), Value::Int8(-128)]
        );
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_f64_is_recorded() {
        let buf = 1.5f64.to_le_bytes();
        let mut reader = PacketReader::new(&buf);
        reader.read_f64().unwrap();
        assert_eq!(reader.values(), &[Value::Float64(1.5)]);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let buf = [1, 2, 3];
        let mut reader = PacketReader::new(&buf);
        let err = reader.read_i32().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BufferUnderrun {
                offset: 0,
                needed: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0);
        assert!(reader.values().is_empty());
    }

    #[test]
    fn test_read_str_sets_cursor_past_terminator() {
        // padding byte pair, then "hi\0", then an i8
        let buf = [0x01, 0x00, b'h', 0, b'i', 0, 0, 0, 0x05];
        let mut reader = PacketReader::new(&buf);
        reader.read_i16().unwrap().read_str().unwrap().read_i8().unwrap();

        assert_eq!(reader.values()[1], Value::Text("hi".to_string()));
        assert_eq!(reader.values()[2], Value::Int8(5));
        assert_eq!(reader.position(), 9);
    }

    #[test]
    fn test_read_empty_str() {
        let buf = [0, 0];
        let mut reader = PacketReader::new(&buf);
        reader.read_str().unwrap();
        assert_eq!(reader.values(), &[Value::Text(String::new())]);
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_unterminated_str_is_bounded() {
        let buf = [b'a', 0, b'b', 0, b'c'];
        let mut reader = PacketReader::new(&buf);
        let err = reader.read_str().unwrap_err();
        assert_eq!(err, ProtocolError::UnterminatedString { offset: 0 });
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_str_at_end_of_buffer() {
        let buf = [0x01];
        let mut reader = PacketReader::new(&buf);
        reader.read_i8().unwrap();
        assert!(matches!(
            reader.read_str(),
            Err(ProtocolError::UnterminatedString { offset: 1 })
        ));
    }

    #[test]
    fn test_read_bytes_copies_block() {
        let buf = [9, 8, 7, 6, 5];
        let mut reader = PacketReader::new(&buf);
        reader.read_i8().unwrap().read_bytes(3).unwrap();
        assert_eq!(
            reader.values()[1],
            Value::Bytes(Bytes::from_static(&[8, 7, 6]))
        );
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_bytes(2).is_err());
    }

    #[test]
    fn test_validity_flag() {
        let mut reader = PacketReader::new(&[]);
        assert!(!reader.is_valid());
        assert!(reader.set_valid(true));
        assert!(reader.is_valid());
        assert!(!reader.set_valid(false));
    }
}
