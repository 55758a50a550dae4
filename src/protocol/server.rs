//! Packets sent by the login server.
//!
//! Each variant knows its opcode and the exact payload size it encodes to, so
//! [`ServerPacket::encode`] can allocate the [`PacketWriter`] once and have
//! `finish` verify that the layout and the size computation agree.
//!
//! [`ServerPacketEncoder`] wraps the same path with configured limits and
//! encode counters for a connection or a whole server.
//!
//! | Packet | Opcode | Layout |
//! |--------|--------|--------|
//! | `InitLS` | `0x00` | `C D(revision) D(key len) B(key)` |
//! | `LoginServerFail` | `0x01` | `C C(reason)` |
//! | `AuthResponse` | `0x02` | `C C(server id) S(server name)` |
//! | `PlayerAuthResponse` | `0x03` | `C S(account) C(approved)` |
//! | `KickPlayer` | `0x04` | `C S(account)` |
//! | `RequestCharacters` | `0x05` | `C S(account)` |
//! | `ChangePasswordResponse` | `0x06` | `C S(account) S(message)` |

use crate::config::ProtocolConfig;
use crate::core::value::text_units;
use crate::core::writer::PacketWriter;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::opcode::{FailReason, ServerOpcode, PROTOCOL_REVISION};
use crate::protocol::registry::ServerRegistry;
use crate::utils::metrics::Metrics;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerPacket {
    InitLs {
        revision: i32,
        public_key: Bytes,
    },
    LoginServerFail {
        reason: FailReason,
    },
    AuthResponse {
        server_id: u8,
        server_name: String,
    },
    PlayerAuthResponse {
        account: String,
        approved: bool,
    },
    KickPlayer {
        account: String,
    },
    RequestCharacters {
        account: String,
    },
    /// `success` is kept for the caller's bookkeeping only; the wire layout
    /// carries just the account and the message text.
    ChangePasswordResponse {
        success: bool,
        account: String,
        message: String,
    },
}

impl ServerPacket {
    pub fn init_ls(public_key: impl Into<Bytes>) -> Self {
        Self::init_ls_with_revision(PROTOCOL_REVISION, public_key)
    }

    pub fn init_ls_with_revision(revision: i32, public_key: impl Into<Bytes>) -> Self {
        ServerPacket::InitLs {
            revision,
            public_key: public_key.into(),
        }
    }

    pub fn login_server_fail(reason: FailReason) -> Self {
        ServerPacket::LoginServerFail { reason }
    }

    /// Builds an `AuthResponse`, resolving the server's display name.
    pub fn auth_response<R>(registry: &R, server_id: u8) -> Result<Self>
    where
        R: ServerRegistry + ?Sized,
    {
        let server_name = registry
            .server_name(server_id)?
            .ok_or(ProtocolError::UnknownServer(server_id))?;
        Ok(ServerPacket::AuthResponse {
            server_id,
            server_name,
        })
    }

    pub fn player_auth_response(account: impl Into<String>, approved: bool) -> Self {
        ServerPacket::PlayerAuthResponse {
            account: account.into(),
            approved,
        }
    }

    pub fn kick_player(account: impl Into<String>) -> Self {
        ServerPacket::KickPlayer {
            account: account.into(),
        }
    }

    pub fn request_characters(account: impl Into<String>) -> Self {
        ServerPacket::RequestCharacters {
            account: account.into(),
        }
    }

    pub fn change_password_response(
        success: bool,
        account: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ServerPacket::ChangePasswordResponse {
            success,
            account: account.into(),
            message: message.into(),
        }
    }

    pub fn opcode(&self) -> ServerOpcode {
        match self {
            ServerPacket::InitLs { .. } => ServerOpcode::InitLs,
            ServerPacket::LoginServerFail { .. } => ServerOpcode::LoginServerFail,
            ServerPacket::AuthResponse { .. } => ServerOpcode::AuthResponse,
            ServerPacket::PlayerAuthResponse { .. } => ServerOpcode::PlayerAuthResponse,
            ServerPacket::KickPlayer { .. } => ServerOpcode::KickPlayer,
            ServerPacket::RequestCharacters { .. } => ServerOpcode::RequestCharacters,
            ServerPacket::ChangePasswordResponse { .. } => ServerOpcode::ChangePasswordResponse,
        }
    }

    /// Exact number of payload bytes, opcode included.
    pub fn payload_len(&self) -> usize {
        let strlen = PacketWriter::string_len;
        match self {
            ServerPacket::InitLs { public_key, .. } => 1 + 4 + 4 + public_key.len(),
            ServerPacket::LoginServerFail { .. } => 2,
            ServerPacket::AuthResponse { server_name, .. } => 2 + strlen(server_name),
            ServerPacket::PlayerAuthResponse { account, .. } => 2 + strlen(account),
            ServerPacket::KickPlayer { account } | ServerPacket::RequestCharacters { account } => {
                1 + strlen(account)
            }
            ServerPacket::ChangePasswordResponse {
                account, message, ..
            } => 1 + strlen(account) + strlen(message),
        }
    }

    /// Encodes the packet into a padded transport buffer.
    ///
    /// Text fields may be of any length; [`ServerPacket::encode_with`] applies
    /// a configured bound.
    pub fn encode(&self) -> Result<Bytes> {
        self.write()
    }

    /// Encodes after checking every text field against
    /// [`ProtocolConfig::max_text_units`].
    pub fn encode_with(&self, config: &ProtocolConfig) -> Result<Bytes> {
        self.check_limits(config)?;
        self.write()
    }

    fn write(&self) -> Result<Bytes> {
        let size = self.payload_len();
        let mut writer = PacketWriter::new(size);
        writer.write_u8(self.opcode().as_u8())?;

        match self {
            ServerPacket::InitLs {
                revision,
                public_key,
            } => {
                let key_len = i32::try_from(public_key.len()).map_err(|_| {
                    ProtocolError::InvalidArgument(constants::ERR_KEY_TOO_LONG.to_string())
                })?;
                writer
                    .write_i32(*revision)?
                    .write_i32(key_len)?
                    .write_bytes(public_key)?;
            }
            ServerPacket::LoginServerFail { reason } => {
                writer.write_u8(reason.code())?;
            }
            ServerPacket::AuthResponse {
                server_id,
                server_name,
            } => {
                writer.write_u8(*server_id)?.write_str(server_name)?;
            }
            ServerPacket::PlayerAuthResponse { account, approved } => {
                writer.write_str(account)?.write_u8(u8::from(*approved))?;
            }
            ServerPacket::KickPlayer { account } | ServerPacket::RequestCharacters { account } => {
                writer.write_str(account)?;
            }
            ServerPacket::ChangePasswordResponse {
                account, message, ..
            } => {
                writer.write_str(account)?.write_str(message)?;
            }
        }

        let content = writer.finish()?;
        debug!(
            opcode = self.opcode().name(),
            payload = size,
            len = content.len(),
            "Encoded server packet"
        );
        Ok(content)
    }

    fn texts(&self) -> Vec<&str> {
        match self {
            ServerPacket::InitLs { .. } | ServerPacket::LoginServerFail { .. } => Vec::new(),
            ServerPacket::AuthResponse { server_name, .. } => vec![server_name.as_str()],
            ServerPacket::PlayerAuthResponse { account, .. }
            | ServerPacket::KickPlayer { account }
            | ServerPacket::RequestCharacters { account } => vec![account.as_str()],
            ServerPacket::ChangePasswordResponse {
                account, message, ..
            } => vec![account.as_str(), message.as_str()],
        }
    }

    fn check_limits(&self, config: &ProtocolConfig) -> Result<()> {
        if self
            .texts()
            .into_iter()
            .any(|text| text_units(text) > config.max_text_units)
        {
            return Err(ProtocolError::InvalidArgument(
                constants::ERR_TEXT_TOO_LONG.to_string(),
            ));
        }
        Ok(())
    }
}

/// Encodes server packets under one [`ProtocolConfig`] and counts what it
/// hands to the transport.
#[derive(Debug)]
pub struct ServerPacketEncoder {
    config: ProtocolConfig,
    metrics: Arc<Metrics>,
}

impl Default for ServerPacketEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerPacketEncoder {
    pub fn new() -> Self {
        Self::from_config(&ProtocolConfig::default())
    }

    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            config: config.clone(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Records into `metrics` instead of a private set of counters.
    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self { metrics, ..self }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[instrument(skip_all, fields(opcode = packet.opcode().name()))]
    pub fn encode(&self, packet: &ServerPacket) -> Result<Bytes> {
        let result = packet.encode_with(&self.config);
        match &result {
            Ok(content) => self.metrics.packet_encoded(content.len() as u64),
            Err(e) => warn!(error = %e, "Failed to encode server packet"),
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::core::reader::PacketReader;
    use crate::core::value::Value;
    use crate::protocol::registry::StaticServerRegistry;

    #[test]
    fn test_init_ls_layout() {
        let key: Vec<u8> = (0u8..16).collect();
        let packet = ServerPacket::init_ls(key.clone());
        assert_eq!(packet.payload_len(), 25);

        let out = packet.encode().expect("encode InitLS");
        assert_eq!(out.len(), 32);
        assert_eq!(out[0], 0x00);
        assert_eq!(&out[1..5], &PROTOCOL_REVISION.to_le_bytes());
        assert_eq!(&out[5..9], &16i32.to_le_bytes());
        assert_eq!(&out[9..25], key.as_slice());
        assert!(out[25..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_login_server_fail_layout() {
        for reason in FailReason::ALL {
            let out = ServerPacket::login_server_fail(reason).encode().unwrap();
            assert_eq!(out.len(), 8);
            assert_eq!(&out[..2], &[0x01, reason.code()]);
        }
    }

    #[test]
    fn test_auth_response_uses_registry() {
        let registry = StaticServerRegistry::new();
        registry.insert(3, "Aden").unwrap();

        let packet = ServerPacket::auth_response(&registry, 3).unwrap();
        let out = packet.encode().unwrap();

        let mut reader = PacketReader::new(&out);
        reader.read_i8().unwrap().read_i8().unwrap().read_str().unwrap();
        assert_eq!(
            reader.values(),
            &[
                Value::Int8(0x02),
                Value::Int8(3),
                Value::Text("Aden".to_string())
            ]
        );
        assert_eq!(reader.position(), packet.payload_len());
    }

    #[test]
    fn test_auth_response_unknown_server() {
        let registry = StaticServerRegistry::new();
        assert_eq!(
            ServerPacket::auth_response(&registry, 42),
            Err(ProtocolError::UnknownServer(42))
        );
    }

    #[test]
    fn test_player_auth_response_flag() {
        for approved in [true, false] {
            let packet = ServerPacket::player_auth_response("anna", approved);
            let out = packet.encode().unwrap();
            let mut reader = PacketReader::new(&out);
            reader.read_i8().unwrap().read_str().unwrap().read_i8().unwrap();
            assert_eq!(reader.values()[0], Value::Int8(0x03));
            assert_eq!(reader.values()[1], Value::Text("anna".to_string()));
            assert_eq!(reader.values()[2], Value::Int8(i8::from(approved)));
        }
    }

    #[test]
    fn test_account_packets_share_layout() {
        let kick = ServerPacket::kick_player("bob").encode().unwrap();
        let chars = ServerPacket::request_characters("bob").encode().unwrap();
        assert_eq!(kick[0], 0x04);
        assert_eq!(chars[0], 0x05);
        assert_eq!(&kick[1..], &chars[1..]);
    }

    #[test]
    fn test_change_password_response_ignores_success_flag() {
        let ok = ServerPacket::change_password_response(true, "carl", "done")
            .encode()
            .unwrap();
        let failed = ServerPacket::change_password_response(false, "carl", "done")
            .encode()
            .unwrap();
        assert_eq!(ok, failed);

        let mut reader = PacketReader::new(&ok);
        reader.read_i8().unwrap().read_str().unwrap().read_str().unwrap();
        assert_eq!(reader.values()[0], Value::Int8(0x06));
        assert_eq!(reader.values()[2], Value::Text("done".to_string()));
        assert_eq!(reader.position(), 1 + 10 + 10);
    }

    #[test]
    fn test_empty_account_still_terminated() {
        let packet = ServerPacket::kick_player("");
        assert_eq!(packet.payload_len(), 3);
        let out = packet.encode().unwrap();
        assert_eq!(&out[..3], &[0x04, 0, 0]);
    }

    #[test]
    fn test_text_limit() {
        let config = ProtocolConfig {
            max_text_units: 4,
            ..ProtocolConfig::default()
        };
        assert!(ServerPacket::kick_player("abcd").encode_with(&config).is_ok());
        assert!(matches!(
            ServerPacket::kick_player("abcde").encode_with(&config),
            Err(ProtocolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_accepts_long_text() {
        let message = "x".repeat(300);
        let packet = ServerPacket::change_password_response(true, "acct", message.clone());
        let out = packet.encode().unwrap();
        assert_eq!(out.len(), crate::core::value::padded_len(packet.payload_len()));

        let mut reader = PacketReader::new(&out);
        reader.read_i8().unwrap().read_str().unwrap().read_str().unwrap();
        assert_eq!(reader.values()[2], Value::Text(message));

        // the configured bound still applies on the limited path
        assert!(matches!(
            packet.encode_with(&ProtocolConfig::default()),
            Err(ProtocolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_account_with_nul_is_rejected() {
        assert!(matches!(
            ServerPacket::kick_player("bo\0b").encode(),
            Err(ProtocolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encoder_counts_packets() {
        let encoder = ServerPacketEncoder::new();
        let fail = encoder
            .encode(&ServerPacket::login_server_fail(FailReason::NoFreeId))
            .unwrap();
        let kick = encoder.encode(&ServerPacket::kick_player("dora")).unwrap();
        assert!(encoder
            .encode(&ServerPacket::kick_player("y".repeat(257)))
            .is_err());

        let snapshot = encoder.metrics().snapshot();
        assert_eq!(snapshot.packets_encoded, 2);
        assert_eq!(snapshot.bytes_encoded, (fail.len() + kick.len()) as u64);
    }

    #[test]
    fn test_encoder_shares_metrics() {
        let metrics = Arc::new(Metrics::new());
        let first = ServerPacketEncoder::new().with_metrics(metrics.clone());
        let second = ServerPacketEncoder::new().with_metrics(metrics.clone());
        first.encode(&ServerPacket::kick_player("a")).unwrap();
        second.encode(&ServerPacket::kick_player("b")).unwrap();
        assert_eq!(metrics.snapshot().packets_encoded, 2);
    }
}
