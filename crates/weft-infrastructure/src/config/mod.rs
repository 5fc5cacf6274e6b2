//! Configuration
//!
//! Layered loading with figment: defaults, then `weft.toml`, then `WEFT__`
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig, ResolutionConfig, TelemetryConfig};
