//! Game-server name lookup used by `AuthResponse`.
//!
//! The registry itself lives outside the codec; this module only fixes the
//! lookup contract and ships an in-memory implementation for tests and small
//! deployments.

use crate::error::{constants, ProtocolError, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

/// Synchronous, read-concurrent lookup of game-server display names.
///
/// `Ok(None)` means the id is not registered; `Err` means the lookup itself
/// failed.
pub trait ServerRegistry: Send + Sync {
    fn server_name(&self, server_id: u8) -> Result<Option<String>>;
}

impl<F> ServerRegistry for F
where
    F: Fn(u8) -> Option<String> + Send + Sync,
{
    fn server_name(&self, server_id: u8) -> Result<Option<String>> {
        Ok(self(server_id))
    }
}

/// In-memory registry guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct StaticServerRegistry {
    servers: RwLock<HashMap<u8, String>>,
}

impl StaticServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, server_id: u8, name: impl Into<String>) -> Result<()> {
        let mut servers = self
            .servers
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_WRITE_LOCK.to_string()))?;
        servers.insert(server_id, name.into());
        Ok(())
    }

    pub fn remove(&self, server_id: u8) -> Result<Option<String>> {
        let mut servers = self
            .servers
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_WRITE_LOCK.to_string()))?;
        Ok(servers.remove(&server_id))
    }

    pub fn len(&self) -> Result<usize> {
        let servers = self
            .servers
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_READ_LOCK.to_string()))?;
        Ok(servers.len())
    }
}

impl FromIterator<(u8, String)> for StaticServerRegistry {
    fn from_iter<I: IntoIterator<Item = (u8, String)>>(iter: I) -> Self {
        Self {
            servers: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl ServerRegistry for StaticServerRegistry {
    fn server_name(&self, server_id: u8) -> Result<Option<String>> {
        let servers = self.servers.read().map_err(|_| {
            warn!(server_id, "Server registry lock poisoned");
            ProtocolError::Custom(constants::ERR_REGISTRY_READ_LOCK.to_string())
        })?;
        Ok(servers.get(&server_id).cloned())
    }
}
