//! Metrics snapshot types
//!
//! The serialized shape of `export_metrics()`. The schema is diagnostic
//! output, not a compatibility contract.

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;
use weft_domain::entities::TraceEntry;

/// One completed top-level request
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Request identifier shared by every sub-resolution
    pub request_id: Uuid,
    /// Identifier requested at the top level
    pub service: String,
    /// Whether an instance was produced
    pub success: bool,
    /// Error message on failure
    pub error: Option<String>,
    /// Wall-clock duration in microseconds
    pub duration_us: u64,
    /// Every transition, including sub-resolutions
    pub entries: Vec<TraceEntry>,
}

/// Per-service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceMetrics {
    /// Top-level requests for the service
    pub resolutions: u64,
    /// Failed top-level requests for the service
    pub failures: u64,
}

/// Cache occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Cached prototypes
    pub prototypes: usize,
    /// Prototype analyses performed
    pub prototype_analyses: u64,
    /// Prototype cache generation
    pub prototype_generation: u64,
    /// Cached singletons
    pub singletons: usize,
}

/// Aggregated telemetry
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// RFC 3339 export time
    pub exported_at: String,
    /// Whether collection is enabled
    pub enabled: bool,
    /// Top-level requests observed
    pub total_resolutions: u64,
    /// Requests that produced an instance
    pub successful_resolutions: u64,
    /// Requests that failed
    pub failed_resolutions: u64,
    /// `failed / total`, zero when nothing was observed
    pub error_rate: f64,
    /// Mean request duration in microseconds
    pub average_duration_us: f64,
    /// Transition counts keyed by state label
    pub transitions: BTreeMap<String, u64>,
    /// Counters keyed by top-level service identifier
    pub services: BTreeMap<String, ServiceMetrics>,
    /// Cache occupancy at export time
    pub cache: CacheMetrics,
    /// Most recent requests, oldest first
    pub recent_traces: Vec<TraceRecord>,
}
