//! Engine settings

use serde::{Deserialize, Serialize};
use weft_domain::constants::{DEFAULT_MAX_RESOLUTION_DEPTH, DEFAULT_MAX_RETAINED_TRACES};

/// Tunables fixed when the container is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSettings {
    /// Deepest allowed dependency chain
    pub max_depth: usize,
    /// Whether the telemetry collector records requests
    pub telemetry_enabled: bool,
    /// How many recent traces the collector keeps
    pub max_retained_traces: usize,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            telemetry_enabled: true,
            max_retained_traces: DEFAULT_MAX_RETAINED_TRACES,
        }
    }
}
