//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the resolution engine.
//!
//! ## Module Categories
//!
//! ### Configuration & Bootstrap
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | figment configuration: defaults, `weft.toml`, `WEFT__` env |
//! | [`bootstrap`] | Container composition root and metrics export |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context conversion into domain errors |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::{bootstrap, bootstrap_from_loader, write_metrics_snapshot};
pub use config::{AppConfig, ConfigBuilder, ConfigLoader};
pub use error_ext::ErrorContext;
