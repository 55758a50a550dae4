//! # Configuration Management
//!
//! Settings for the login protocol codec.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ```toml
//! [protocol]
//! protocol_revision = 262
//! max_inbound_size = 16384
//! max_text_units = 256
//! ```

use crate::error::{ProtocolError, Result};
use crate::protocol::opcode::PROTOCOL_REVISION;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest inbound packet accepted by default (16 KiB)
pub const MAX_INBOUND_SIZE: usize = 16 * 1024;

/// Longest text field, in UTF-16 units, accepted by default
pub const MAX_TEXT_UNITS: usize = 256;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct CodecConfig {
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(revision) = std::env::var("LOGIN_PROTOCOL_REVISION") {
            config.protocol.protocol_revision = parse_revision(&revision)?;
        }

        if let Ok(size) = std::env::var("LOGIN_PROTOCOL_MAX_INBOUND_SIZE") {
            config.protocol.max_inbound_size = size.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid LOGIN_PROTOCOL_MAX_INBOUND_SIZE: {e}"))
            })?;
        }

        if let Ok(units) = std::env::var("LOGIN_PROTOCOL_MAX_TEXT_UNITS") {
            config.protocol.max_text_units = units.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid LOGIN_PROTOCOL_MAX_TEXT_UNITS: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        self.protocol.validate()
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Wire-level limits and constants
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Revision announced in `InitLS`
    pub protocol_revision: i32,

    /// Largest inbound packet, opcode included, the dispatcher accepts
    pub max_inbound_size: usize,

    /// Longest text field, in UTF-16 units, server packets may carry
    pub max_text_units: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            protocol_revision: PROTOCOL_REVISION,
            max_inbound_size: MAX_INBOUND_SIZE,
            max_text_units: MAX_TEXT_UNITS,
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.protocol_revision <= 0 {
            errors.push(format!(
                "Invalid protocol revision: {} (must be positive)",
                self.protocol_revision
            ));
        }

        // must hold at least a RequestAuthLogin: opcode + 128-byte block
        if self.max_inbound_size < 129 {
            errors.push(format!(
                "Max inbound size too small: {} bytes (minimum: 129)",
                self.max_inbound_size
            ));
        } else if self.max_inbound_size > u16::MAX as usize {
            errors.push(format!(
                "Max inbound size too large: {} bytes (maximum: {})",
                self.max_inbound_size,
                u16::MAX
            ));
        }

        if self.max_text_units == 0 {
            errors.push("Max text units must be greater than 0".to_string());
        } else if self.max_text_units > 4096 {
            errors.push(format!(
                "Max text units too large: {} (maximum: 4096)",
                self.max_text_units
            ));
        }

        errors
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
fn parse_revision(raw: &str) -> Result<i32> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => i32::from_str_radix(hex, 16),
        None => raw.parse::<i32>(),
    };
    parsed.map_err(|e| ProtocolError::ConfigError(format!("Invalid LOGIN_PROTOCOL_REVISION: {e}")))
}
