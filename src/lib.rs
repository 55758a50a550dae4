//! # Login Protocol
//!
//! Binary packet codec for a game login-server protocol.
//!
//! Inbound byte buffers are decoded into typed, validated values; outbound
//! server messages are encoded into exactly sized buffers padded for the
//! transport frame. Sockets, ciphers and session state live elsewhere; this
//! crate only ever sees "a buffer to decode" or "a message to encode".
//!
//! ## Example
//! ```rust
//! use login_protocol::protocol::dispatcher::ClientPacketTable;
//! use login_protocol::protocol::client::ClientPacket;
//! use login_protocol::protocol::opcode::FailReason;
//! use login_protocol::protocol::server::ServerPacket;
//!
//! let out = ServerPacket::login_server_fail(FailReason::IpBanned).encode().unwrap();
//! assert_eq!(&out[..2], &[0x01, 0x01]);
//! assert_eq!(out.len() % 8, 0);
//!
//! let table = ClientPacketTable::with_defaults();
//! let mut packet = vec![0x07];
//! packet.extend_from_slice(&42i32.to_le_bytes());
//! packet.extend_from_slice(&[0u8; 16]);
//! match table.decode(&packet).unwrap() {
//!     ClientPacket::AuthGameGuard(guard) => assert_eq!(guard.session_id, 42),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::reader::PacketReader;
pub use crate::core::value::Value;
pub use crate::core::writer::PacketWriter;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::client::{ClientPacket, Inbound};
pub use crate::protocol::dispatcher::ClientPacketTable;
pub use crate::protocol::opcode::{ClientOpcode, FailReason, ServerOpcode, PROTOCOL_REVISION};
pub use crate::protocol::server::{ServerPacket, ServerPacketEncoder};
