//! Telemetry Collector
//!
//! Observes finished requests. Nothing in the pipeline reads from the
//! collector, so enabling or disabling it cannot change a resolution.

use crate::telemetry::snapshot::{CacheMetrics, MetricsSnapshot, ServiceMetrics, TraceRecord};
use dashmap::DashMap;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;
use weft_domain::entities::ResolutionTrace;
use weft_domain::error::Error;
use weft_domain::value_objects::ResolutionState;

/// Thread-safe resolution metrics
#[derive(Debug)]
pub struct TelemetryCollector {
    enabled: bool,
    max_retained: usize,
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    total_duration_us: AtomicU64,
    transitions: DashMap<ResolutionState, u64>,
    services: DashMap<String, ServiceMetrics>,
    recent: Mutex<VecDeque<TraceRecord>>,
}

impl TelemetryCollector {
    /// Create a collector
    pub fn new(enabled: bool, max_retained: usize) -> Self {
        Self {
            enabled,
            max_retained,
            total: AtomicU64::new(0),
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
            transitions: DashMap::new(),
            services: DashMap::new(),
            recent: Mutex::new(VecDeque::with_capacity(max_retained.min(1024))),
        }
    }

    /// A collector that records nothing
    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    /// Whether observations are recorded
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one finished top-level request
    pub fn observe(
        &self,
        request_id: Uuid,
        service: &str,
        trace: &ResolutionTrace,
        elapsed: Duration,
        error: Option<&Error>,
    ) {
        if !self.enabled {
            return;
        }

        let duration_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.total.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us
            .fetch_add(duration_us, Ordering::Relaxed);
        if error.is_some() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.successful.fetch_add(1, Ordering::Relaxed);
        }

        for entry in trace.iter_rev() {
            *self.transitions.entry(entry.state).or_insert(0) += 1;
        }
        {
            let mut stats = self.services.entry(service.to_string()).or_default();
            stats.resolutions += 1;
            if error.is_some() {
                stats.failures += 1;
            }
        }

        if self.max_retained == 0 {
            return;
        }
        let record = TraceRecord {
            request_id,
            service: service.to_string(),
            success: error.is_none(),
            error: error.map(ToString::to_string),
            duration_us,
            entries: trace.entries(),
        };
        let mut recent = self
            .recent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while recent.len() >= self.max_retained {
            recent.pop_front();
        }
        recent.push_back(record);
    }

    /// Aggregate everything observed so far
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let duration = self.total_duration_us.load(Ordering::Relaxed);
        #[allow(clippy::cast_precision_loss)]
        let (error_rate, average_duration_us) = if total > 0 {
            (failed as f64 / total as f64, duration as f64 / total as f64)
        } else {
            (0.0, 0.0)
        };

        let transitions: BTreeMap<String, u64> = self
            .transitions
            .iter()
            .map(|entry| (entry.key().as_str().to_string(), *entry.value()))
            .collect();
        let services: BTreeMap<String, ServiceMetrics> = self
            .services
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        let recent_traces = self
            .recent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();

        MetricsSnapshot {
            exported_at: chrono::Utc::now().to_rfc3339(),
            enabled: self.enabled,
            total_resolutions: total,
            successful_resolutions: self.successful.load(Ordering::Relaxed),
            failed_resolutions: failed,
            error_rate,
            average_duration_us,
            transitions,
            services,
            cache: CacheMetrics::default(),
            recent_traces,
        }
    }

    /// Forget everything observed so far
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.successful.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.total_duration_us.store(0, Ordering::Relaxed);
        self.transitions.clear();
        self.services.clear();
        self.recent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(true, weft_domain::constants::DEFAULT_MAX_RETAINED_TRACES)
    }
}
