//! # Utility Modules
//!
//! Supporting utilities shared across the codec.
//!
//! ## Components
//! - **Metrics**: thread-safe counters for encoded, decoded and rejected packets

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
