//! # Login Protocol Messages
//!
//! The message catalog built on top of the core reader and writer.
//!
//! ## Components
//! - **Opcode**: server and client opcode tables, failure reasons, protocol revision
//! - **Server**: packets the login server sends, with exact size computation
//! - **Client**: decoders for packets received from game clients
//! - **Dispatcher**: opcode-keyed decoder table with runtime-registered extensions
//! - **Registry**: game-server name lookup used by `AuthResponse`

pub mod client;
pub mod dispatcher;
pub mod opcode;
pub mod registry;
pub mod server;
