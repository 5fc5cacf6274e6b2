//! Main application configuration

use serde::{Deserialize, Serialize};
use weft_application::KernelSettings;

pub use super::logging::LoggingConfig;
pub use super::resolution::ResolutionConfig;
pub use super::telemetry::TelemetryConfig;

/// Top-level configuration, one section per concern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Resolution engine limits
    pub resolution: ResolutionConfig,
    /// Resolution telemetry
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Engine settings derived from this configuration
    pub fn kernel_settings(&self) -> KernelSettings {
        KernelSettings {
            max_depth: self.resolution.max_depth,
            telemetry_enabled: self.telemetry.enabled,
            max_retained_traces: self.telemetry.max_retained_traces,
        }
    }
}
