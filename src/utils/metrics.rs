//! Codec Metrics
//!
//! Atomic counters for packets passing through the codec. Safe to share
//! between connections; every update is a relaxed atomic add.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct Metrics {
    /// Server packets encoded
    pub packets_encoded: AtomicU64,
    /// Bytes handed to the transport, padding included
    pub bytes_encoded: AtomicU64,
    /// Client packets decoded successfully
    pub packets_decoded: AtomicU64,
    /// Bytes of successfully decoded client packets
    pub bytes_decoded: AtomicU64,
    /// Client packets rejected by the dispatcher
    pub packets_rejected: AtomicU64,
    start_time: Instant,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub packets_encoded: u64,
    pub bytes_encoded: u64,
    pub packets_decoded: u64,
    pub bytes_decoded: u64,
    pub packets_rejected: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            packets_encoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            packets_decoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            packets_rejected: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an encoded server packet
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded client packet
    pub fn packet_decoded(&self, byte_count: u64) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a rejected client packet
    pub fn packet_rejected(&self) {
        self.packets_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            packets_rejected: self.packets_rejected.load(Ordering::Relaxed),
        }
    }

    /// Log a summary of all counters
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            uptime_secs = self.uptime_secs(),
            packets_encoded = snapshot.packets_encoded,
            bytes_encoded = snapshot.bytes_encoded,
            packets_decoded = snapshot.packets_decoded,
            bytes_decoded = snapshot.bytes_decoded,
            packets_rejected = snapshot.packets_rejected,
            "Codec metrics"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
