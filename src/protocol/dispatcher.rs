use crate::config::ProtocolConfig;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::client::{AuthGameGuard, ClientPacket, Inbound, RequestAuthLogin};
use crate::protocol::opcode::ClientOpcode;
use crate::utils::metrics::Metrics;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, warn};

type DecoderFn = dyn Fn(&[u8]) -> Result<ClientPacket> + Send + Sync + 'static;

/// Opcode-keyed table of inbound packet decoders.
///
/// The first byte of every packet selects the decoder; the decoder sees only
/// the body that follows it.
pub struct ClientPacketTable {
    decoders: Arc<RwLock<HashMap<u8, Arc<DecoderFn>>>>,
    max_packet_size: usize,
    metrics: Arc<Metrics>,
}

impl Default for ClientPacketTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientPacketTable {
    /// Creates a table with no decoders registered.
    pub fn new() -> Self {
        Self {
            decoders: Arc::new(RwLock::new(HashMap::new())),
            max_packet_size: ProtocolConfig::default().max_inbound_size,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Creates a table with the built-in `RequestAuthLogin` and
    /// `AuthGameGuard` decoders.
    pub fn with_defaults() -> Self {
        let mut decoders: HashMap<u8, Arc<DecoderFn>> = HashMap::new();
        decoders.insert(
            ClientOpcode::RequestAuthLogin.as_u8(),
            Arc::new(|body: &[u8]| {
                let inbound = RequestAuthLogin::decode(body)?;
                typed(ClientOpcode::RequestAuthLogin, body, RequestAuthLogin::MIN_LEN, inbound)
                    .map(ClientPacket::RequestAuthLogin)
            }),
        );
        decoders.insert(
            ClientOpcode::AuthGameGuard.as_u8(),
            Arc::new(|body: &[u8]| {
                let inbound = AuthGameGuard::decode(body)?;
                typed(ClientOpcode::AuthGameGuard, body, AuthGameGuard::MIN_LEN, inbound)
                    .map(ClientPacket::AuthGameGuard)
            }),
        );

        Self {
            decoders: Arc::new(RwLock::new(decoders)),
            ..Self::new()
        }
    }

    /// Default table with limits taken from `config`.
    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            max_packet_size: config.max_inbound_size,
            ..Self::with_defaults()
        }
    }

    /// Records into `metrics` instead of a private set of counters.
    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self { metrics, ..self }
    }

    /// Installs `decoder` for `opcode`, replacing any previous one.
    ///
    /// Decoders run without the table lock held, so a decoder may itself
    /// register or unregister entries.
    pub fn register<F>(&self, opcode: u8, decoder: F) -> Result<()>
    where
        F: Fn(&[u8]) -> Result<ClientPacket> + Send + Sync + 'static,
    {
        let mut decoders = self.decoders.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string())
        })?;

        decoders.insert(opcode, Arc::new(decoder));
        Ok(())
    }

    /// Removes a decoder, returning whether one was registered.
    pub fn unregister(&self, opcode: u8) -> Result<bool> {
        let mut decoders = self.decoders.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string())
        })?;

        Ok(decoders.remove(&opcode).is_some())
    }

    pub fn contains(&self, opcode: u8) -> Result<bool> {
        let decoders = self.decoders.read().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string())
        })?;

        Ok(decoders.contains_key(&opcode))
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[instrument(skip_all, fields(len = packet.len()))]
    pub fn decode(&self, packet: &[u8]) -> Result<ClientPacket> {
        let result = self.route(packet);
        match &result {
            Ok(decoded) => {
                self.metrics.packet_decoded(packet.len() as u64);
                debug!(packet = decoded.name(), "Decoded client packet");
            }
            Err(e) => {
                self.metrics.packet_rejected();
                warn!(error = %e, "Rejected client packet");
            }
        }
        result
    }

    fn route(&self, packet: &[u8]) -> Result<ClientPacket> {
        let (&opcode, body) = packet.split_first().ok_or(ProtocolError::EmptyPacket)?;
        if packet.len() > self.max_packet_size {
            return Err(ProtocolError::OversizedPacket(packet.len()));
        }

        let decoder = self
            .decoders
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?
            .get(&opcode)
            .cloned();

        match decoder {
            Some(decoder) => decoder(body),
            None => match ClientOpcode::try_from(opcode) {
                Ok(known) if !known.has_builtin_layout() => {
                    Err(ProtocolError::UnsupportedLayout(opcode))
                }
                _ => Err(ProtocolError::UnexpectedOpcode(opcode)),
            },
        }
    }
}

/// Unwraps a decoder's verdict, turning an invalid body into `PacketTooShort`.
fn typed<T>(opcode: ClientOpcode, body: &[u8], min: usize, inbound: Inbound<T>) -> Result<T> {
    inbound
        .into_packet()
        .ok_or(ProtocolError::PacketTooShort {
            opcode: opcode.as_u8(),
            len: body.len(),
            min,
        })
}
