//! Opcode tables and protocol constants.
//!
//! Server and client opcodes are independent namespaces; both start at `0x00`.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Protocol revision announced to game servers in `InitLS`.
pub const PROTOCOL_REVISION: i32 = 0x0106;

/// Opcodes of packets sent by the login server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ServerOpcode {
    InitLs = 0x00,
    LoginServerFail = 0x01,
    AuthResponse = 0x02,
    PlayerAuthResponse = 0x03,
    KickPlayer = 0x04,
    RequestCharacters = 0x05,
    ChangePasswordResponse = 0x06,
}

impl ServerOpcode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ServerOpcode::InitLs => "InitLS",
            ServerOpcode::LoginServerFail => "LoginServerFail",
            ServerOpcode::AuthResponse => "AuthResponse",
            ServerOpcode::PlayerAuthResponse => "PlayerAuthResponse",
            ServerOpcode::KickPlayer => "KickPlayer",
            ServerOpcode::RequestCharacters => "RequestCharacters",
            ServerOpcode::ChangePasswordResponse => "ChangePasswordResponse",
        }
    }
}

impl TryFrom<u8> for ServerOpcode {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(ServerOpcode::InitLs),
            0x01 => Ok(ServerOpcode::LoginServerFail),
            0x02 => Ok(ServerOpcode::AuthResponse),
            0x03 => Ok(ServerOpcode::PlayerAuthResponse),
            0x04 => Ok(ServerOpcode::KickPlayer),
            0x05 => Ok(ServerOpcode::RequestCharacters),
            0x06 => Ok(ServerOpcode::ChangePasswordResponse),
            other => Err(ProtocolError::UnexpectedOpcode(other)),
        }
    }
}

/// Opcodes of packets sent by game clients.
///
/// `RequestServerList` and `RequestServerLogin` are part of the protocol
/// surface but have no built-in layout; they decode only once a decoder is
/// registered for them on a [`ClientPacketTable`](crate::protocol::dispatcher::ClientPacketTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClientOpcode {
    RequestAuthLogin = 0x00,
    RequestServerLogin = 0x02,
    RequestServerList = 0x05,
    AuthGameGuard = 0x07,
}

impl ClientOpcode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ClientOpcode::RequestAuthLogin => "RequestAuthLogin",
            ClientOpcode::RequestServerLogin => "RequestServerLogin",
            ClientOpcode::RequestServerList => "RequestServerList",
            ClientOpcode::AuthGameGuard => "AuthGameGuard",
        }
    }

    /// Whether this crate ships a decoder for the opcode.
    pub fn has_builtin_layout(self) -> bool {
        matches!(
            self,
            ClientOpcode::RequestAuthLogin | ClientOpcode::AuthGameGuard
        )
    }
}

impl TryFrom<u8> for ClientOpcode {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(ClientOpcode::RequestAuthLogin),
            0x02 => Ok(ClientOpcode::RequestServerLogin),
            0x05 => Ok(ClientOpcode::RequestServerList),
            0x07 => Ok(ClientOpcode::AuthGameGuard),
            other => Err(ProtocolError::UnexpectedOpcode(other)),
        }
    }
}

/// Reason codes carried by `LoginServerFail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FailReason {
    IpBanned = 1,
    IpReserved = 2,
    WrongHexId = 3,
    IdReserved = 4,
    NoFreeId = 5,
    NotAuthenticated = 6,
    AlreadyLoggedIn = 7,
}

impl FailReason {
    pub const ALL: [FailReason; 7] = [
        FailReason::IpBanned,
        FailReason::IpReserved,
        FailReason::WrongHexId,
        FailReason::IdReserved,
        FailReason::NoFreeId,
        FailReason::NotAuthenticated,
        FailReason::AlreadyLoggedIn,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FailReason {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        FailReason::ALL
            .into_iter()
            .find(|reason| reason.code() == code)
            .ok_or(ProtocolError::UnknownFailReason(code))
    }
}
