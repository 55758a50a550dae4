//! # Wire Primitives
//!
//! The six field types every login packet is built from, plus the text and
//! padding arithmetic shared by the reader and writer.
//!
//! | Kind | Width | Encoding |
//! |------|-------|----------|
//! | `D`  | 4     | `i32`, little-endian |
//! | `H`  | 2     | `i16`, little-endian |
//! | `C`  | 1     | `i8` |
//! | `F`  | 8     | `f64`, IEEE-754 little-endian |
//! | `S`  | 2n+2  | UTF-16LE code units followed by a zero unit |
//! | `B`  | n     | raw bytes, length known to the caller |

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Bytes reserved after every outbound payload for the transport frame header.
pub const FRAME_HEADER_RESERVE: usize = 4;

/// Outbound buffers are padded to a multiple of this many bytes.
pub const FRAME_ALIGNMENT: usize = 8;

/// Width of the UTF-16 zero terminator that ends every `S` field.
pub const TEXT_TERMINATOR_LEN: usize = 2;

/// A single decoded field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int32(i32),
    Int16(i16),
    Int8(i8),
    Float64(f64),
    Text(String),
    Bytes(Bytes),
}

impl Value {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::Int8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

/// Number of UTF-16 code units in `text`.
#[inline]
pub fn text_units(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Encoded size of an `S` field: two bytes per code unit plus the terminator.
#[inline]
pub fn encoded_text_len(text: &str) -> usize {
    text_units(text) * 2 + TEXT_TERMINATOR_LEN
}

/// Total buffer length for a payload of `size` bytes.
///
/// The smallest multiple of [`FRAME_ALIGNMENT`] that still leaves
/// [`FRAME_HEADER_RESERVE`] bytes after the payload.
#[inline]
pub fn padded_len(size: usize) -> usize {
    let reserved = size + FRAME_HEADER_RESERVE;
    match reserved % FRAME_ALIGNMENT {
        0 => reserved,
        rem => reserved + (FRAME_ALIGNMENT - rem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_terminator_only() {
        assert_eq!(encoded_text_len(""), 2);
    }

    #[test]
    fn test_text_len_counts_code_units_not_bytes() {
        assert_eq!(encoded_text_len("abc"), 8);
        // two-byte UTF-8, one UTF-16 unit
        assert_eq!(encoded_text_len("é"), 4);
        // surrogate pair
        assert_eq!(encoded_text_len("😀"), 6);
    }

    #[test]
    fn test_padded_len_alignment() {
        for size in 0..64 {
            let len = padded_len(size);
            assert_eq!(len % FRAME_ALIGNMENT, 0, "size {size}");
            assert!(len >= size + FRAME_HEADER_RESERVE, "size {size}");
            assert!(len < size + FRAME_HEADER_RESERVE + FRAME_ALIGNMENT, "size {size}");
        }
        assert_eq!(padded_len(4), 8);
        assert_eq!(padded_len(25), 32);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int32(1).as_i32(), Some(1));
        assert_eq!(Value::Text("a".to_string()).as_str(), Some("a"));
        assert_eq!(Value::Float64(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Int16(-2).as_i16(), Some(-2));
        assert_eq!(Value::Int8(3).as_i32(), None);
    }
}
