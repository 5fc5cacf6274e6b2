//! Kernel - the resolution surface
//!
//! A kernel is the handle one unit of work (a request, a job, a thread)
//! resolves through. It shares every cache of its [`Container`] but owns its
//! scope stack, which is why it is not `Sync`. Each public call is a kernel
//! boundary: it starts a fresh [`KernelContext`], runs the pipeline, reports
//! to telemetry and wraps failures in `Error::Resolution` with the chain of
//! the innermost failure.
//!
//! ## Example
//!
//! ```
//! use weft_application::kernel::Container;
//! use weft_domain::entities::{Arguments, ClassDescriptor};
//! use weft_domain::ports::Service;
//!
//! struct ConsoleLogger;
//! impl Service for ConsoleLogger {}
//!
//! let mut builder = Container::builder();
//! builder
//!     .class(ClassDescriptor::concrete("ConsoleLogger", |_: &Arguments| Ok(ConsoleLogger)))?
//!     .singleton("Logger", "ConsoleLogger")?;
//! let container = builder.build();
//!
//! let kernel = container.kernel();
//! let first = kernel.get("Logger")?;
//! let second = kernel.get("Logger")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! # Ok::<(), weft_domain::Error>(())
//! ```

use crate::definitions::DefinitionStore;
use crate::kernel::callable::Callable;
use crate::kernel::container::Container;
use crate::kernel::inspect::{InjectionReport, inspect};
use crate::kernel::pipeline::ResolutionPipeline;
use crate::prototype::PrototypeAnalyzer;
use crate::scope::ScopeManager;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use weft_domain::entities::{Arguments, ClassDescriptor, KernelContext};
use weft_domain::error::{Error, Result};
use weft_domain::ports::{Instance, Service, concrete_type_id};
use weft_domain::value_objects::ScopeId;

/// Per-unit-of-work resolution handle
pub struct Kernel {
    container: Container,
    scopes: RefCell<ScopeManager>,
}

impl Kernel {
    pub(crate) fn new(container: Container) -> Self {
        let scopes = ScopeManager::with_id_source(Arc::clone(&container.core().scope_ids));
        Self {
            container,
            scopes: RefCell::new(scopes),
        }
    }

    /// Container this kernel resolves from
    pub fn container(&self) -> &Container {
        &self.container
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve an identifier, honoring its lifetime
    pub fn get(&self, id: &str) -> Result<Instance> {
        self.execute(&KernelContext::new(id))
    }

    /// Resolve and downcast to `T`
    pub fn get_as<T: Service>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?
            .downcast_arc::<T>()
            .map_err(|_| Error::type_mismatch(id, std::any::type_name::<T>()))
    }

    /// Whether a definition exists for the identifier
    ///
    /// Says nothing about whether `get` would succeed: autowiring can still
    /// fail, and ids with no definition can still autowire.
    pub fn has(&self, id: &str) -> bool {
        self.container.has(id)
    }

    /// Build a fresh instance, bypassing singleton and scoped caches
    ///
    /// `parameters` replace resolved constructor arguments of the same name.
    pub fn make(&self, id: &str, parameters: Arguments) -> Result<Instance> {
        self.execute(&KernelContext::new(id).with_overrides(parameters).fresh())
    }

    /// `make` and downcast to `T`
    pub fn make_as<T: Service>(&self, id: &str, parameters: Arguments) -> Result<Arc<T>> {
        self.make(id, parameters)?
            .downcast_arc::<T>()
            .map_err(|_| Error::type_mismatch(id, std::any::type_name::<T>()))
    }

    /// Resolve a callable's parameters and invoke it
    ///
    /// Explicit `parameters` take precedence; any that the callable does not
    /// declare are passed through unchanged.
    pub fn call<R>(&self, callable: &Callable<R>, parameters: Arguments) -> Result<R> {
        let ctx = KernelContext::new(callable.name()).with_overrides(parameters);
        self.boundary(&ctx, |pipeline, ctx| {
            let plans = PrototypeAnalyzer::analyze_parameters(callable.parameters(), callable.hints());
            let mut arguments =
                pipeline.resolve_arguments(ctx, callable.name(), &plans, ctx.overrides())?;
            for (name, argument) in ctx.overrides().iter() {
                if !arguments.contains(name) {
                    arguments.insert(name, argument.clone());
                }
            }
            callable.invoke(&arguments)
        })
    }

    /// Apply injection points to an object this kernel did not build
    ///
    /// The object's class is found by its Rust type. Returns the number of
    /// points applied.
    pub fn inject_into(&self, object: &Instance) -> Result<usize> {
        let class = self.class_of(object)?;
        let ctx = KernelContext::new(class.name());
        self.boundary(&ctx, |pipeline, ctx| {
            let prototype = self.container.core().prototypes.get_or_analyze(&class)?;
            pipeline.inject(ctx, &prototype, object)
        })
    }

    /// Resolve with a caller-supplied context, keeping its parent chain
    pub fn resolve_context(&self, context: KernelContext) -> Result<Instance> {
        let detector = &self.container.core().detector;
        self.boundary(&context, |pipeline, ctx| {
            detector.check(ctx)?;
            pipeline.resolve(ctx)
        })
    }

    /// Resolve every identifier carrying the tag, in tag order
    pub fn tagged(&self, tag: &str) -> Result<Vec<Instance>> {
        let definitions = self.get_definitions();
        definitions.tagged(tag).iter().map(|id| self.get(id)).collect()
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Open a nested scope
    pub fn begin_scope(&self) -> ScopeId {
        self.scopes.borrow_mut().begin()
    }

    /// Close the innermost scope, disposing what it owns
    pub fn end_scope(&self, id: ScopeId) -> Result<usize> {
        self.scopes.borrow_mut().end(id)
    }

    /// Open a scope that ends when the guard is dropped
    pub fn enter_scope(&self) -> ScopeGuard<'_> {
        ScopeGuard {
            kernel: self,
            id: self.begin_scope(),
        }
    }

    /// Innermost open scope
    pub fn active_scope(&self) -> Option<ScopeId> {
        self.scopes.borrow().active()
    }

    /// Number of open scopes
    pub fn scope_depth(&self) -> usize {
        self.scopes.borrow().depth()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Dry-run report for an existing object
    pub fn inspect_injection(&self, object: &Instance) -> Result<InjectionReport> {
        let class = self.class_of(object)?;
        inspect(
            &self.get_definitions(),
            self.container.classes(),
            &class,
            &Arguments::new(),
        )
    }

    /// Dry-run report for a class by name, as `make` would see it
    pub fn inspect_class(&self, class: &str, parameters: &Arguments) -> Result<InjectionReport> {
        let descriptor = self
            .container
            .classes()
            .get(class)
            .ok_or_else(|| Error::service_not_found(class, &[]))?;
        inspect(
            &self.get_definitions(),
            self.container.classes(),
            &descriptor,
            parameters,
        )
    }

    /// Serialized telemetry snapshot
    pub fn export_metrics(&self) -> Result<String> {
        self.container.export_metrics()
    }

    /// Read-only definition snapshot
    pub fn get_definitions(&self) -> Arc<DefinitionStore> {
        self.container.definitions()
    }

    // ========================================================================
    // Boundary
    // ========================================================================

    fn execute(&self, ctx: &KernelContext) -> Result<Instance> {
        self.boundary(ctx, |pipeline, ctx| pipeline.resolve(ctx))
    }

    fn boundary<R, F>(&self, ctx: &KernelContext, run: F) -> Result<R>
    where
        F: FnOnce(&ResolutionPipeline<'_>, &KernelContext) -> Result<R>,
    {
        let core = self.container.core();
        let started = Instant::now();
        let pipeline = ResolutionPipeline::new(core, &self.scopes);
        let result = run(&pipeline, ctx);

        core.telemetry.observe(
            ctx.request_id(),
            ctx.service_id(),
            &pipeline.trace(),
            started.elapsed(),
            result.as_ref().err(),
        );

        result.map_err(|err| {
            let chain = pipeline.failure_chain().unwrap_or_else(|| ctx.stack());
            debug!(service = %ctx.service_id(), error = %err, "Resolution failed");
            Error::resolution(ctx.service_id(), chain, err)
        })
    }

    fn class_of(&self, object: &Instance) -> Result<Arc<ClassDescriptor>> {
        self.container
            .classes()
            .for_type(concrete_type_id(object.as_ref()))
            .ok_or_else(|| Error::invalid_argument("object's type is not a registered class"))
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        let open = self.scopes.get_mut().depth();
        if open > 0 {
            let disposed = self.scopes.get_mut().dispose_all();
            warn!(open, disposed, "Kernel dropped with open scopes");
        }
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("container", &self.container)
            .field("scopes", &self.scopes.borrow().depth())
            .finish()
    }
}

/// Ends its scope when dropped
pub struct ScopeGuard<'k> {
    kernel: &'k Kernel,
    id: ScopeId,
}

impl ScopeGuard<'_> {
    /// Guarded scope id
    pub fn id(&self) -> ScopeId {
        self.id
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.kernel.end_scope(self.id) {
            warn!(scope = %self.id, error = %err, "Failed to end scope on drop");
        }
    }
}
