//! # Core Codec Components
//!
//! Low-level primitives for turning login packets into bytes and back.
//!
//! This module knows nothing about individual messages; it only provides the
//! field encodings and the two cursors that every message is built from.
//!
//! ## Components
//! - **Value**: field kinds, decoded values, text and padding arithmetic
//! - **Reader**: bounds-checked decoder over a borrowed buffer
//! - **Writer**: exact-size encoder producing padded transport buffers
//!
//! ## Wire Format
//! ```text
//! [Opcode(1)] [Fields...] [Reserved(4)] [Padding(0..7)]
//! ```
//! Integers and floats are little-endian, text is null-terminated UTF-16LE.

pub mod reader;
pub mod value;
pub mod writer;
