//! Packets received from game clients.
//!
//! Decoders take the packet *body*, the bytes after the opcode. Each decoder
//! owns its minimum-length precondition: a body shorter than the layout yields
//! an [`Inbound`] that reports `is_valid() == false` and exposes no typed packet.

use crate::core::reader::PacketReader;
use crate::core::value::Value;
use crate::error::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Decoded values of one inbound packet plus the validity verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound<T> {
    valid: bool,
    values: Vec<Value>,
    packet: Option<T>,
}

impl<T> Inbound<T> {
    fn invalid(reader: PacketReader<'_>) -> Self {
        Self {
            valid: false,
            values: reader.into_values(),
            packet: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Raw decoded fields in wire order. Empty for invalid packets.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The typed packet, present only when the body was valid.
    pub fn packet(&self) -> Option<&T> {
        self.packet.as_ref()
    }

    pub fn into_packet(self) -> Option<T> {
        self.packet
    }
}

/// GameGuard handshake: five `D` fields, the first being the session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGameGuard {
    pub session_id: i32,
    pub data: [i32; 4],
}

impl AuthGameGuard {
    pub const MIN_LEN: usize = 20;

    pub fn decode(body: &[u8]) -> Result<Inbound<Self>> {
        let mut reader = PacketReader::new(body);
        if !reader.set_valid(body.len() >= Self::MIN_LEN) {
            return Ok(Inbound::invalid(reader));
        }

        reader
            .read_i32()?
            .read_i32()?
            .read_i32()?
            .read_i32()?
            .read_i32()?;

        let mut fields = [0i32; 5];
        for (slot, value) in fields.iter_mut().zip(reader.values()) {
            *slot = value.as_i32().unwrap_or_default();
        }
        let [session_id, data @ ..] = fields;

        Ok(Inbound {
            valid: true,
            values: reader.into_values(),
            packet: Some(AuthGameGuard { session_id, data }),
        })
    }
}

/// Login credentials: one opaque 128-byte block.
///
/// The block is normally enciphered; taking it apart is left to the
/// decryption stage that consumes [`RequestAuthLogin::credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAuthLogin {
    pub credentials: Bytes,
}

impl RequestAuthLogin {
    pub const BLOCK_LEN: usize = 128;
    pub const MIN_LEN: usize = Self::BLOCK_LEN;

    pub fn decode(body: &[u8]) -> Result<Inbound<Self>> {
        let mut reader = PacketReader::new(body);
        if !reader.set_valid(body.len() >= Self::MIN_LEN) {
            return Ok(Inbound::invalid(reader));
        }

        reader.read_bytes(Self::BLOCK_LEN)?;
        let credentials = reader
            .values()
            .first()
            .and_then(Value::as_bytes)
            .cloned()
            .unwrap_or_default();

        Ok(Inbound {
            valid: true,
            values: reader.into_values(),
            packet: Some(RequestAuthLogin { credentials }),
        })
    }
}

/// Any inbound packet the dispatcher can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientPacket {
    AuthGameGuard(AuthGameGuard),
    RequestAuthLogin(RequestAuthLogin),
    /// Produced by decoders registered at runtime for opcodes without a
    /// built-in layout.
    Extension { opcode: u8, values: Vec<Value> },
}

impl ClientPacket {
    pub fn name(&self) -> &'static str {
        match self {
            ClientPacket::AuthGameGuard(_) => "AuthGameGuard",
            ClientPacket::RequestAuthLogin(_) => "RequestAuthLogin",
            ClientPacket::Extension { .. } => "Extension",
        }
    }
}
