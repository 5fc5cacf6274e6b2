//! Container and its builder
//!
//! ## Phases
//!
//! | Phase | Type | Mutability |
//! |-------|------|------------|
//! | Boot | [`ContainerBuilder`] | registration surface, `&mut self` |
//! | Run | [`Container`] | shared, `Send + Sync`, definitions read-only |
//! | Unit of work | [`Kernel`] | owns its scope stack, not `Sync` |
//!
//! The only post-boot mutation of definitions is
//! [`Container::replace_definitions`], which swaps the whole store
//! atomically. Requests already running keep the snapshot they started with.

use crate::classes::ClassRegistry;
use crate::definitions::{ContextualBindingBuilder, DefinitionStore};
use crate::graph::CycleDetector;
use crate::kernel::handle::Kernel;
use crate::kernel::settings::KernelSettings;
use crate::prototype::PrototypeCache;
use crate::singleton::SingletonRegistry;
use crate::telemetry::{CacheMetrics, MetricsSnapshot, TelemetryCollector};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;
use weft_domain::entities::{ClassDescriptor, Concrete};
use weft_domain::error::Result;
use weft_domain::ports::{Instance, ServiceResolver};
use weft_domain::value_objects::Lifetime;

// ============================================================================
// Builder
// ============================================================================

/// Registration surface used while booting
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    definitions: DefinitionStore,
    classes: ClassRegistry,
    settings: KernelSettings,
}

impl ContainerBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the engine settings
    pub fn with_settings(mut self, settings: KernelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Engine settings the container will use
    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    /// Register a class descriptor
    pub fn class(&mut self, class: ClassDescriptor) -> Result<&mut Self> {
        self.classes.register(class)?;
        Ok(self)
    }

    /// Bind an identifier to a concrete with the given lifetime
    pub fn bind<S, C>(&mut self, id: S, concrete: C, lifetime: Lifetime) -> Result<&mut Self>
    where
        S: Into<String>,
        C: Into<Concrete>,
    {
        self.definitions.bind(id, concrete, lifetime)?;
        Ok(self)
    }

    /// Bind with a singleton lifetime
    pub fn singleton<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<&mut Self> {
        self.bind(id, concrete, Lifetime::Singleton)
    }

    /// Bind with a scoped lifetime
    pub fn scoped<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<&mut Self> {
        self.bind(id, concrete, Lifetime::Scoped)
    }

    /// Bind with a transient lifetime
    pub fn transient<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<&mut Self> {
        self.bind(id, concrete, Lifetime::Transient)
    }

    /// Register a pre-built instance
    pub fn instance<S: Into<String>>(&mut self, id: S, instance: Instance) -> Result<&mut Self> {
        self.definitions.instance(id, instance)?;
        Ok(self)
    }

    /// Register a decorator for an identifier
    pub fn extend<S, F>(&mut self, id: S, extender: F) -> Result<&mut Self>
    where
        S: Into<String>,
        F: Fn(Instance, &dyn ServiceResolver) -> Result<Instance> + Send + Sync + 'static,
    {
        self.definitions.extend(id, extender)?;
        Ok(self)
    }

    /// Start a contextual rule
    pub fn when<S: Into<String>>(&mut self, consumer: S) -> ContextualBindingBuilder<'_> {
        self.definitions.when(consumer)
    }

    /// Attach tags to identifiers
    pub fn tag<I, T>(&mut self, ids: I, tags: T) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.definitions.tag(ids, tags)?;
        Ok(self)
    }

    /// Definitions registered so far
    pub fn definitions(&self) -> &DefinitionStore {
        &self.definitions
    }

    /// Direct access to the definition store
    pub fn definitions_mut(&mut self) -> &mut DefinitionStore {
        &mut self.definitions
    }

    /// Classes registered so far
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Freeze the registrations into a container
    pub fn build(self) -> Container {
        info!(
            definitions = self.definitions.len(),
            classes = self.classes.len(),
            max_depth = self.settings.max_depth,
            telemetry = self.settings.telemetry_enabled,
            "Container built"
        );
        Container {
            core: Arc::new(ContainerCore {
                definitions: ArcSwap::from_pointee(self.definitions),
                classes: self.classes,
                prototypes: PrototypeCache::new(),
                singletons: SingletonRegistry::new(),
                telemetry: TelemetryCollector::new(
                    self.settings.telemetry_enabled,
                    self.settings.max_retained_traces,
                ),
                detector: CycleDetector::new(self.settings.max_depth),
                settings: self.settings,
                scope_ids: Arc::new(AtomicU64::new(0)),
            }),
        }
    }
}

// ============================================================================
// Container
// ============================================================================

pub(crate) struct ContainerCore {
    pub(crate) definitions: ArcSwap<DefinitionStore>,
    pub(crate) classes: ClassRegistry,
    pub(crate) prototypes: PrototypeCache,
    pub(crate) singletons: SingletonRegistry,
    pub(crate) telemetry: TelemetryCollector,
    pub(crate) detector: CycleDetector,
    pub(crate) settings: KernelSettings,
    pub(crate) scope_ids: Arc<AtomicU64>,
}

/// Built, shareable container
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    /// Start a registration phase
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Kernel for one unit of work
    pub fn kernel(&self) -> Kernel {
        Kernel::new(self.clone())
    }

    pub(crate) fn core(&self) -> &ContainerCore {
        &self.core
    }

    /// Current definition snapshot
    pub fn definitions(&self) -> Arc<DefinitionStore> {
        self.core.definitions.load_full()
    }

    /// Whether a definition exists for the identifier
    pub fn has(&self, id: &str) -> bool {
        self.core.definitions.load().has(id)
    }

    /// Registered classes
    pub fn classes(&self) -> &ClassRegistry {
        &self.core.classes
    }

    /// Prototype cache
    pub fn prototypes(&self) -> &PrototypeCache {
        &self.core.prototypes
    }

    /// Singleton registry
    pub fn singletons(&self) -> &SingletonRegistry {
        &self.core.singletons
    }

    /// Engine settings
    pub fn settings(&self) -> &KernelSettings {
        &self.core.settings
    }

    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Swap the whole definition store, then drop every cached singleton
    ///
    /// Returns the number of singletons dropped.
    pub fn replace_definitions(&self, definitions: DefinitionStore) -> usize {
        let count = definitions.len();
        self.core.definitions.store(Arc::new(definitions));
        let flushed = self.core.singletons.clear();
        info!(definitions = count, flushed, "Definition store replaced");
        flushed
    }

    /// Drop one cached singleton
    pub fn forget_instance(&self, id: &str) -> bool {
        self.core.singletons.remove(id)
    }

    /// Drop every cached singleton
    pub fn flush_singletons(&self) -> usize {
        let flushed = self.core.singletons.clear();
        info!(flushed, "Singletons flushed");
        flushed
    }

    /// Drop every cached prototype; returns the new cache generation
    pub fn invalidate_prototypes(&self) -> u64 {
        let generation = self.core.prototypes.invalidate();
        info!(generation, "Prototype cache invalidated");
        generation
    }

    // ========================================================================
    // Telemetry
    // ========================================================================

    /// Aggregated telemetry plus cache occupancy
    pub fn metrics(&self) -> MetricsSnapshot {
        let mut snapshot = self.core.telemetry.snapshot();
        snapshot.cache = CacheMetrics {
            prototypes: self.core.prototypes.len(),
            prototype_analyses: self.core.prototypes.analysis_count(),
            prototype_generation: self.core.prototypes.generation(),
            singletons: self.core.singletons.len(),
        };
        snapshot
    }

    /// Metrics serialized as pretty JSON
    pub fn export_metrics(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.metrics())?)
    }

    /// Forget collected telemetry
    pub fn reset_metrics(&self) {
        self.core.telemetry.reset();
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.core.definitions.load().len())
            .field("classes", &self.core.classes.len())
            .field("singletons", &self.core.singletons.len())
            .field("settings", &self.core.settings)
            .finish()
    }
}
