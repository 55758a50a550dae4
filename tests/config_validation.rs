//! Integration tests for configuration loading and validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use login_protocol::config::{CodecConfig, ProtocolConfig};
use login_protocol::error::ProtocolError;
use login_protocol::protocol::dispatcher::ClientPacketTable;
use login_protocol::protocol::server::ServerPacket;

#[test]
fn test_default_config_validates() {
    let config = CodecConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_non_positive_revision() {
    let config = CodecConfig::default_with_overrides(|c| c.protocol.protocol_revision = 0);
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Invalid protocol revision")));
}

#[test]
fn test_inbound_size_bounds() {
    let mut config = CodecConfig::default();
    config.protocol.max_inbound_size = 128;
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Max inbound size too small")));

    config.protocol.max_inbound_size = 1 << 20;
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Max inbound size too large")));

    config.protocol.max_inbound_size = 129;
    assert!(config.validate().is_empty());
}

#[test]
fn test_text_units_bounds() {
    let mut config = CodecConfig::default();
    config.protocol.max_text_units = 0;
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("must be greater than 0")));

    config.protocol.max_text_units = 10_000;
    assert!(config.validate().iter().any(|e| e.contains("too large")));
}

#[test]
fn test_validate_strict_collects_all_errors() {
    let config = CodecConfig {
        protocol: ProtocolConfig {
            protocol_revision: -1,
            max_inbound_size: 0,
            max_text_units: 0,
        },
    };
    match config.validate_strict() {
        Err(ProtocolError::ConfigError(msg)) => {
            assert!(msg.contains("Configuration validation failed"));
            assert_eq!(msg.matches("\n  - ").count(), 3);
        }
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_from_toml() {
    let config = CodecConfig::from_toml(
        r#"
        [protocol]
        protocol_revision = 264
        max_inbound_size = 4096
        max_text_units = 32
        "#,
    )
    .expect("parse");
    assert_eq!(config.protocol.protocol_revision, 264);
    assert_eq!(config.protocol.max_inbound_size, 4096);
    assert_eq!(config.protocol.max_text_units, 32);
}

#[test]
fn test_from_toml_missing_section_uses_defaults() {
    let config = CodecConfig::from_toml("").expect("parse");
    assert_eq!(config, CodecConfig::default());
}

#[test]
fn test_from_toml_rejects_garbage() {
    assert!(matches!(
        CodecConfig::from_toml("[protocol]\nprotocol_revision = \"x\""),
        Err(ProtocolError::ConfigError(_))
    ));
}

#[test]
fn test_example_config_roundtrip() {
    let example = CodecConfig::example_config();
    assert!(example.contains("[protocol]"));
    let parsed = CodecConfig::from_toml(&example).expect("example parses");
    assert_eq!(parsed, CodecConfig::default());
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!(
        "login-protocol-config-{}.toml",
        std::process::id()
    ));
    let config = CodecConfig::default_with_overrides(|c| c.protocol.max_text_units = 64);
    config.save_to_file(&path).expect("save");

    let loaded = CodecConfig::from_file(&path).expect("load");
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        CodecConfig::from_file("/nonexistent/login-protocol.toml"),
        Err(ProtocolError::ConfigError(_))
    ));
}

#[test]
fn test_config_drives_codec() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.protocol.protocol_revision = 0x0107;
        c.protocol.max_inbound_size = 200;
    });

    let out = ServerPacket::init_ls_with_revision(config.protocol.protocol_revision, vec![1u8; 4])
        .encode_with(&config.protocol)
        .unwrap();
    assert_eq!(&out[1..5], &0x0107i32.to_le_bytes());

    let table = ClientPacketTable::from_config(&config.protocol);
    assert_eq!(
        table.decode(&[0u8; 201]),
        Err(ProtocolError::OversizedPacket(201))
    );
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = CodecConfig::from_toml("[protocol]\nmax_text_units = 16\n").expect("parse");
    assert_eq!(config.protocol.max_text_units, 16);
    assert_eq!(
        config.protocol.max_inbound_size,
        ProtocolConfig::default().max_inbound_size
    );
}

#[test]
fn test_from_env_overrides() {
    std::env::set_var("LOGIN_PROTOCOL_REVISION", "0x0108");
    std::env::set_var("LOGIN_PROTOCOL_MAX_TEXT_UNITS", "48");
    let config = CodecConfig::from_env();

    std::env::set_var("LOGIN_PROTOCOL_MAX_INBOUND_SIZE", "lots");
    let bad = CodecConfig::from_env();

    std::env::remove_var("LOGIN_PROTOCOL_REVISION");
    std::env::remove_var("LOGIN_PROTOCOL_MAX_TEXT_UNITS");
    std::env::remove_var("LOGIN_PROTOCOL_MAX_INBOUND_SIZE");

    let config = config.expect("env config");
    assert_eq!(config.protocol.protocol_revision, 0x0108);
    assert_eq!(config.protocol.max_text_units, 48);
    assert_eq!(config.protocol.max_inbound_size, 16 * 1024);
    assert!(matches!(bad, Err(ProtocolError::ConfigError(_))));
}
