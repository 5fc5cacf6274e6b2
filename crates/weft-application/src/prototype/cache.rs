//! Prototype Cache
//!
//! Get-or-build cache of prototypes keyed by class name. A vacant entry is
//! analyzed while its shard is held, so concurrent first requests for the
//! same class still analyze it once. Failed analyses are not cached.

use crate::prototype::analyzer::PrototypeAnalyzer;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use weft_domain::entities::{ClassDescriptor, ServicePrototype};
use weft_domain::error::Result;

/// Concurrent prototype cache
#[derive(Debug, Default)]
pub struct PrototypeCache {
    entries: DashMap<String, Arc<ServicePrototype>>,
    analyses: AtomicU64,
    generation: AtomicU64,
}

impl PrototypeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached prototype for the class, analyzing it on first use
    pub fn get_or_analyze(&self, class: &ClassDescriptor) -> Result<Arc<ServicePrototype>> {
        if let Some(cached) = self.entries.get(class.name()).map(|entry| Arc::clone(entry.value())) {
            return Ok(cached);
        }

        match self.entries.entry(class.name().to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let prototype = Arc::new(PrototypeAnalyzer::analyze(class)?);
                self.analyses.fetch_add(1, Ordering::Relaxed);
                debug!(
                    class = %class.name(),
                    parameters = prototype.parameters.len(),
                    injection_points = prototype.injection_points.len(),
                    "Analyzed class prototype"
                );
                entry.insert(Arc::clone(&prototype));
                Ok(prototype)
            }
        }
    }

    /// Cached prototype, without analyzing
    pub fn peek(&self, class: &str) -> Option<Arc<ServicePrototype>> {
        self.entries.get(class).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop one class's prototype
    pub fn invalidate_class(&self, class: &str) -> bool {
        self.entries.remove(class).is_some()
    }

    /// Drop every prototype and start a new generation
    pub fn invalidate(&self) -> u64 {
        self.entries.clear();
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// How many analyses ran since the cache was created
    pub fn analysis_count(&self) -> u64 {
        self.analyses.load(Ordering::Relaxed)
    }

    /// Current cache generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Number of cached prototypes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
