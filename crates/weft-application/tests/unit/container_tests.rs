//! Tests for container-level caches, invalidation and telemetry

use crate::fixtures::*;
use std::sync::Arc;
use weft_application::{DefinitionStore, KernelSettings};

#[test]
fn test_prototype_analyzed_once_per_class() {
    let mut builder = base_builder();
    builder.transient("Engine", "Engine").unwrap();
    let container = builder.build();
    let kernel = container.kernel();

    for _ in 0..3 {
        kernel.get("Engine").unwrap();
    }

    assert_eq!(container.prototypes().analysis_count(), 1);
    assert!(container.prototypes().peek("Engine").is_some());
}

#[test]
fn test_invalidating_prototypes_forces_reanalysis() {
    let mut builder = base_builder();
    builder.transient("Engine", "Engine").unwrap();
    let container = builder.build();
    let kernel = container.kernel();

    kernel.get("Engine").unwrap();
    assert_eq!(container.invalidate_prototypes(), 1);
    assert!(container.prototypes().is_empty());
    kernel.get("Engine").unwrap();

    assert_eq!(container.prototypes().analysis_count(), 2);
}

#[test]
fn test_replace_definitions_flushes_singletons() {
    let mut builder = base_builder();
    builder.singleton("Logger", "ConsoleLogger").unwrap();
    let container = builder.build();
    let kernel = container.kernel();
    assert!(kernel.get("Logger").unwrap().is::<ConsoleLogger>());

    let mut replacement = DefinitionStore::new();
    replacement.singleton("Logger", "FileLogger").unwrap();
    let flushed = container.replace_definitions(replacement);

    assert_eq!(flushed, 1);
    assert!(kernel.get("Logger").unwrap().is::<FileLogger>());
    assert_eq!(kernel.get_definitions().len(), 1);
}

#[test]
fn test_forget_instance_rebuilds_singleton() {
    let mut builder = base_builder();
    builder.singleton("Engine", "Engine").unwrap();
    let container = builder.build();
    let kernel = container.kernel();

    let first = kernel.get("Engine").unwrap();
    assert!(container.forget_instance("Engine"));
    let second = kernel.get("Engine").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!container.forget_instance("Unknown"));
}

#[test]
fn test_metrics_count_successes_and_failures() {
    let mut builder = base_builder();
    builder.singleton("Engine", "Engine").unwrap();
    let container = builder.build();
    let kernel = container.kernel();

    kernel.get("Engine").unwrap();
    kernel.get("Engine").unwrap();
    assert!(kernel.get("Missing").is_err());

    let metrics = container.metrics();
    assert_eq!(metrics.total_resolutions, 3);
    assert_eq!(metrics.successful_resolutions, 2);
    assert_eq!(metrics.failed_resolutions, 1);
    assert_eq!(metrics.services["Missing"].failures, 1);
    assert_eq!(metrics.services["Engine"].resolutions, 2);
    assert_eq!(metrics.transitions["success"], 2);
    assert_eq!(metrics.cache.singletons, 1);
    assert_eq!(metrics.recent_traces.len(), 3);
    assert!(!metrics.recent_traces[2].success);
}

#[test]
fn test_export_metrics_is_json() {
    let container = base_builder().build();
    container.kernel().get("Engine").unwrap();

    let exported = container.export_metrics().unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();

    assert_eq!(value["total_resolutions"], 1);
    assert!(value["recent_traces"][0]["entries"].is_array());
}

#[test]
fn test_disabled_telemetry_records_nothing() {
    let settings = KernelSettings {
        telemetry_enabled: false,
        ..KernelSettings::default()
    };
    let container = base_builder().with_settings(settings).build();
    container.kernel().get("Engine").unwrap();

    let metrics = container.metrics();
    assert!(!metrics.enabled);
    assert_eq!(metrics.total_resolutions, 0);
}

#[test]
fn test_reset_metrics_clears_counters() {
    let container = base_builder().build();
    container.kernel().get("Engine").unwrap();
    container.reset_metrics();

    assert_eq!(container.metrics().total_resolutions, 0);
}
