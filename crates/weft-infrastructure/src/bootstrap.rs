//! Container bootstrap
//!
//! Composition root helpers: turn an [`AppConfig`] plus a registration
//! closure into a built [`Container`], and persist its metrics.
//!
//! ```text
//! ConfigLoader ─▶ AppConfig ─▶ KernelSettings ─▶ ContainerBuilder ─▶ register(..) ─▶ Container
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (config, container) = bootstrap_from_loader(&ConfigLoader::new(), |builder| {
//!     builder.singleton("Logger", "ConsoleLogger")?;
//!     Ok(())
//! })?;
//! let kernel = container.kernel();
//! ```

use crate::config::{AppConfig, ConfigLoader};
use crate::error_ext::ErrorContext;
use std::path::Path;
use tracing::info;
use weft_application::{Container, ContainerBuilder};
use weft_domain::error::{Error, Result};

/// Build a container from configuration and registrations
pub fn bootstrap<F>(config: &AppConfig, register: F) -> Result<Container>
where
    F: FnOnce(&mut ContainerBuilder) -> Result<()>,
{
    let mut builder = ContainerBuilder::new().with_settings(config.kernel_settings());
    register(&mut builder)?;
    let container = builder.build();
    info!(
        definitions = container.definitions().len(),
        classes = container.classes().len(),
        "Container bootstrapped"
    );
    Ok(container)
}

/// Load configuration, then bootstrap
pub fn bootstrap_from_loader<F>(loader: &ConfigLoader, register: F) -> Result<(AppConfig, Container)>
where
    F: FnOnce(&mut ContainerBuilder) -> Result<()>,
{
    let config = loader.load()?;
    let container = bootstrap(&config, register)?;
    Ok((config, container))
}

/// Write the container's metrics snapshot as JSON, creating parent directories
pub fn write_metrics_snapshot<P: AsRef<Path>>(container: &Container, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .io_context(format!("Failed to create {}", parent.display()))?;
    }
    let snapshot = container.export_metrics()?;
    std::fs::write(path, snapshot)
        .io_context(format!("Failed to write metrics to {}", path.display()))?;
    info!(path = %path.display(), "Metrics snapshot written");
    Ok(())
}

/// Write metrics to the configured `telemetry.metrics_file`
pub fn write_configured_metrics(container: &Container, config: &AppConfig) -> Result<()> {
    let path = config
        .telemetry
        .metrics_file
        .as_deref()
        .ok_or_else(|| Error::configuration("telemetry.metrics_file is not set"))?;
    write_metrics_snapshot(container, path)
}
