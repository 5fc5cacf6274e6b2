//! Configuration types module

pub mod app;
pub mod logging;
pub mod resolution;
pub mod telemetry;

// Re-export main types
pub use app::*;
