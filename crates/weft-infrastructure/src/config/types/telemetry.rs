//! Telemetry configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use weft_domain::constants::DEFAULT_MAX_RETAINED_TRACES;

/// Resolution telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Record traces and counters for every top-level request
    pub enabled: bool,

    /// Number of recent traces kept for export
    pub max_retained_traces: usize,

    /// Where `write_metrics_snapshot` writes when no path is given
    pub metrics_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retained_traces: DEFAULT_MAX_RETAINED_TRACES,
            metrics_file: None,
        }
    }
}
