//! Singleton Registry
//!
//! Container-wide map of identifier to instance. Cleared only by explicit
//! invalidation.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use weft_domain::ports::Instance;

/// Shared singleton instances
#[derive(Default)]
pub struct SingletonRegistry {
    instances: DashMap<String, Instance>,
}

impl SingletonRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance for the identifier
    pub fn get(&self, id: &str) -> Option<Instance> {
        self.instances.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Store `instance` unless another caller stored one first
    ///
    /// Returns whichever instance ends up registered, so racing first
    /// resolutions on different threads all observe the same singleton.
    pub fn insert_if_absent(&self, id: &str, instance: Instance) -> Instance {
        let entry = self
            .instances
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(id = %id, "Caching singleton instance");
                instance
            });
        Arc::clone(entry.value())
    }

    /// Drop one cached instance
    pub fn remove(&self, id: &str) -> bool {
        self.instances.remove(id).is_some()
    }

    /// Drop every cached instance
    pub fn clear(&self) -> usize {
        let count = self.instances.len();
        self.instances.clear();
        count
    }

    /// Whether an instance is cached for the identifier
    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Number of cached instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl std::fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instances", &self.instances.len())
            .finish()
    }
}
