//! Telemetry and observability subsystem.
//!
//! Provides counters and an execution-latency histogram for monitoring
//! pool behavior. Compiled out entirely without the `telemetry` feature;
//! the stub below keeps the call sites identical either way.

#[cfg(feature = "telemetry")]
pub mod metrics;

#[cfg(feature = "telemetry")]
pub use metrics::{Metrics, MetricsSnapshot};

// Stub implementations when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub mod metrics {
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone)]
    pub struct Metrics;

    impl Metrics {
        pub fn new() -> Self {
            Self
        }
        pub fn record_scheduled(&self) {}
        pub fn record_execution(&self, _: u64) {}
        pub fn record_panic(&self) {}
        pub fn record_rejected(&self) {}
        pub fn snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }
        pub fn reset(&self) {}
    }

    impl Default for Metrics {
        fn default() -> Self {
            Self::new()
        }
    }

    // Field-for-field mirror of the real snapshot so code written against
    // it builds with the feature off.
    #[derive(Debug, Clone, Default)]
    pub struct MetricsSnapshot {
        pub timestamp: Option<Instant>,
        pub uptime: Duration,
        pub tasks_scheduled: u64,
        pub tasks_executed: u64,
        pub tasks_panicked: u64,
        pub items_rejected: u64,
        pub avg_latency_ns: u64,
        pub p50_latency_ns: u64,
        pub p95_latency_ns: u64,
        pub p99_latency_ns: u64,
        pub max_latency_ns: u64,
    }

    impl MetricsSnapshot {
        pub fn tasks_per_second(&self) -> f64 {
            0.0
        }

        pub fn in_flight(&self) -> u64 {
            0
        }
    }
}
