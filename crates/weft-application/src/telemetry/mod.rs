//! Resolution telemetry

pub mod collector;
pub mod snapshot;

pub use collector::TelemetryCollector;
pub use snapshot::{CacheMetrics, MetricsSnapshot, ServiceMetrics, TraceRecord};
