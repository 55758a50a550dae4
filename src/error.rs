//! # Error Types
//!
//! Error handling for the login protocol codec.
//!
//! This module defines every failure the codec can report, from cursor bounds
//! violations inside a single reader or writer up to dispatch-level rejections
//! of whole inbound packets.
//!
//! ## Error Categories
//! - **Bounds Errors**: reads past the end of a buffer, writes past a declared size
//! - **Framing Errors**: packets shorter than their layout, unknown opcodes, oversized input
//! - **Argument Errors**: values that cannot be represented on the wire
//! - **Lookup Errors**: unknown game servers in the registry
//! - **Configuration Errors**: malformed or out-of-range settings
//!
//! A packet that is merely too short for its layout is *not* an error at the
//! decoder level: decoders report it through [`Inbound::is_valid`](crate::protocol::client::Inbound::is_valid).
//! Only the dispatcher turns it into [`ProtocolError::PacketTooShort`].
//!
//! ## Example Usage
//! ```rust
//! use login_protocol::error::{ProtocolError, Result};
//! use login_protocol::core::reader::PacketReader;
//!
//! fn first_int(body: &[u8]) -> Result<i32> {
//!     let mut reader = PacketReader::new(body);
//!     reader.read_i32()?;
//!     match reader.values().first() {
//!         Some(value) => value.as_i32().ok_or(ProtocolError::Custom("not an int".into())),
//!         None => Err(ProtocolError::EmptyPacket),
//!     }
//! }
//!
//! assert_eq!(first_int(&[1, 0, 0, 0]).unwrap(), 1);
//! assert!(matches!(first_int(&[1, 0]), Err(ProtocolError::BufferUnderrun { .. })));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Registry-related error messages
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on server registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on server registry";

    /// Argument validation errors
    pub const ERR_KEY_TOO_LONG: &str = "Public key length does not fit in a 32-bit length prefix";
    pub const ERR_TEXT_TOO_LONG: &str = "Text field exceeds the maximum number of UTF-16 units";
    pub const ERR_TEXT_INTERIOR_NUL: &str = "Text field contains a NUL character";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Buffer underrun at offset {offset}: need {needed} bytes, {available} available")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Buffer overflow at offset {offset}: need {needed} bytes, declared size is {capacity}")]
    BufferOverflow {
        offset: usize,
        needed: usize,
        capacity: usize,
    },

    #[error("Packet size mismatch: declared {declared} bytes, wrote {written}")]
    SizeMismatch { declared: usize, written: usize },

    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown game server: {0}")]
    UnknownServer(u8),

    #[error("Unknown login failure reason: {0}")]
    UnknownFailReason(u8),

    #[error("Empty packet")]
    EmptyPacket,

    #[error("Unexpected opcode: {0:#04x}")]
    UnexpectedOpcode(u8),

    #[error("No wire layout registered for opcode {0:#04x}")]
    UnsupportedLayout(u8),

    #[error("Packet {opcode:#04x} too short: {len} bytes, need at least {min}")]
    PacketTooShort { opcode: u8, len: usize, min: usize },

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
