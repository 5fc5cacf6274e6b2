//! Resolution Pipeline
//!
//! The staged state machine behind every `get`, `make` and `call`. One
//! pipeline value serves one top-level request and every sub-resolution it
//! triggers; it holds the definition snapshot the request started with, the
//! request's trace, and the chain of the innermost failure.
//!
//! ```text
//! ContextualLookup ──hit──────────────────────────────┐
//!        │ miss                                        ▼
//! DefinitionLookup ─▶ Autowire ──────────────────▶ Evaluate ─▶ Instantiate ─▶ Success
//!                        │ no class                                  │ not found
//!                        ▼                                           ▼
//!                     NotFound                                    NotFound
//! ```
//!
//! Instantiation of a class candidate resolves every constructor parameter
//! through this same pipeline with the current id pushed onto the chain,
//! applies injection points, runs the extenders registered for the
//! requested id, and finally applies the lifetime policy of the definition.

use crate::definitions::DefinitionStore;
use crate::kernel::container::ContainerCore;
use crate::kernel::resolver::PipelineResolver;
use crate::scope::ScopeManager;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::debug;
use weft_domain::entities::{
    Arguments, Concrete, Factory, KernelContext, ParameterPlan, ParameterTarget, ResolutionTrace,
    ServiceDefinition, ServicePrototype, TraceOutcome,
};
use weft_domain::error::{Error, Result};
use weft_domain::ports::Instance;
use weft_domain::value_objects::{Lifetime, ResolutionState};

/// What the lookup stages found
enum Candidate {
    /// Cached or otherwise ready instance
    Existing(Instance),
    /// Concrete of a registered definition
    Defined(Concrete, Lifetime),
    /// Consumer-specific override
    Contextual(Concrete),
    /// Class of the same name, with no definition
    Autowired(String),
}

/// How Instantiate produces the instance
enum Strategy {
    Existing(Instance),
    Build(String),
    Delegate(String),
    Invoke(Factory),
}

pub(crate) struct ResolutionPipeline<'k> {
    core: &'k ContainerCore,
    scopes: &'k RefCell<ScopeManager>,
    definitions: Arc<DefinitionStore>,
    trace: RefCell<ResolutionTrace>,
    failure_chain: RefCell<Option<Vec<String>>>,
}

impl<'k> ResolutionPipeline<'k> {
    pub(crate) fn new(core: &'k ContainerCore, scopes: &'k RefCell<ScopeManager>) -> Self {
        Self {
            core,
            scopes,
            definitions: core.definitions.load_full(),
            trace: RefCell::new(ResolutionTrace::start()),
            failure_chain: RefCell::new(None),
        }
    }

    /// Definition snapshot used by this request
    pub(crate) fn definitions(&self) -> &DefinitionStore {
        &self.definitions
    }

    /// Transitions recorded so far
    pub(crate) fn trace(&self) -> ResolutionTrace {
        self.trace.borrow().clone()
    }

    /// Resolution stack of the innermost failure, if the request failed
    pub(crate) fn failure_chain(&self) -> Option<Vec<String>> {
        self.failure_chain.borrow().clone()
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Run the pipeline for one context
    pub(crate) fn resolve(&self, ctx: &KernelContext) -> Result<Instance> {
        let result = self.run(ctx);
        if result.is_err() {
            let mut chain = self.failure_chain.borrow_mut();
            if chain.is_none() {
                *chain = Some(ctx.stack());
            }
        }
        result
    }

    /// Resolve `id` as a dependency of the service in `parent`
    pub(crate) fn resolve_dependency(&self, parent: &KernelContext, id: &str) -> Result<Instance> {
        let child = self.core.detector.enter(parent, id)?;
        self.resolve(&child)
    }

    /// Resolve constructor or callable parameters
    ///
    /// Per parameter: an explicit override wins; a service target is
    /// resolved, falling back to the default (then `null` when optional) only
    /// if that exact identifier is not found; a value target takes its
    /// default or `null`.
    pub(crate) fn resolve_arguments(
        &self,
        ctx: &KernelContext,
        owner: &str,
        plans: &[ParameterPlan],
        overrides: &Arguments,
    ) -> Result<Arguments> {
        let mut arguments = Arguments::new();
        for plan in plans {
            if let Some(explicit) = overrides.get(&plan.name) {
                arguments.insert(plan.name.clone(), explicit.clone());
                continue;
            }

            match &plan.target {
                ParameterTarget::Service(dependency) => {
                    match self.resolve_dependency(ctx, dependency) {
                        Ok(instance) => arguments.insert(plan.name.clone(), instance),
                        Err(err) if err.is_not_found_for(dependency) => match plan.fallback() {
                            Some(value) => {
                                debug!(
                                    consumer = %owner,
                                    parameter = %plan.name,
                                    dependency = %dependency,
                                    "Dependency not found, using fallback value"
                                );
                                self.recover();
                                arguments.insert(plan.name.clone(), value);
                            }
                            None => return Err(err),
                        },
                        Err(err) => return Err(err),
                    }
                }
                ParameterTarget::Value => {
                    let value = plan.fallback().unwrap_or(serde_json::Value::Null);
                    arguments.insert(plan.name.clone(), value);
                }
                ParameterTarget::Unresolvable => {
                    return Err(Error::unresolvable(owner, &plan.name, &ctx.stack()));
                }
            }
        }
        Ok(arguments)
    }

    /// Apply a prototype's injection points to an existing instance
    ///
    /// Optional points whose target cannot be found are skipped. Returns the
    /// number of points applied.
    pub(crate) fn inject(
        &self,
        ctx: &KernelContext,
        prototype: &ServicePrototype,
        instance: &Instance,
    ) -> Result<usize> {
        let mut applied = 0;
        for point in &prototype.injection_points {
            let dependency = match self.resolve_dependency(ctx, &point.target) {
                Ok(dependency) => dependency,
                Err(err) if point.optional && err.is_not_found_for(&point.target) => {
                    self.recover();
                    continue;
                }
                Err(err) => return Err(err),
            };
            (point.injector())(instance.as_ref(), dependency).map_err(|err| {
                Error::auto_resolve_with_source(
                    &prototype.class,
                    format!("injection into '{}' failed", point.name),
                    err,
                )
            })?;
            applied += 1;
        }
        Ok(applied)
    }

    // ========================================================================
    // State machine
    // ========================================================================

    fn run(&self, ctx: &KernelContext) -> Result<Instance> {
        let id = ctx.service_id();
        let mut state = ResolutionState::ContextualLookup;

        let contextual = ctx
            .consumer()
            .and_then(|consumer| self.definitions.contextual(consumer, id))
            .cloned();
        let candidate = if let Some(concrete) = contextual {
            self.record(state, id, TraceOutcome::Hit);
            Self::advance(&mut state, ResolutionState::Evaluate)?;
            Candidate::Contextual(concrete)
        } else {
            self.record(state, id, TraceOutcome::Miss);
            Self::advance(&mut state, ResolutionState::DefinitionLookup)?;

            let found = self
                .lookup_definition(ctx)
                .inspect_err(|_| self.record(state, id, TraceOutcome::Failed))?;
            let outcome = if found.is_some() {
                TraceOutcome::Hit
            } else {
                TraceOutcome::Miss
            };
            self.record(state, id, outcome);
            Self::advance(&mut state, ResolutionState::Autowire)?;

            let candidate = match found {
                Some(candidate) => {
                    self.record(state, id, TraceOutcome::Skipped);
                    candidate
                }
                None => self.autowire(ctx, &mut state)?,
            };
            Self::advance(&mut state, ResolutionState::Evaluate)?;
            candidate
        };

        let (strategy, lifetime) = self.evaluate(id, candidate);
        self.record(state, id, TraceOutcome::Hit);
        Self::advance(&mut state, ResolutionState::Instantiate)?;

        let instance = match strategy {
            Strategy::Existing(instance) => {
                self.record(state, id, TraceOutcome::Skipped);
                instance
            }
            strategy => {
                let produced = self
                    .instantiate(ctx, strategy)
                    .and_then(|instance| self.extend(ctx, instance))
                    .and_then(|instance| self.apply_lifetime(ctx, lifetime, instance));
                match produced {
                    Ok(instance) => {
                        self.record(state, id, TraceOutcome::Hit);
                        instance
                    }
                    Err(err) => {
                        self.record(state, id, TraceOutcome::Failed);
                        if err.is_not_found() {
                            Self::advance(&mut state, ResolutionState::NotFound)?;
                            self.record(state, id, TraceOutcome::Failed);
                        }
                        return Err(err);
                    }
                }
            }
        };

        Self::advance(&mut state, ResolutionState::Success)?;
        self.record(state, id, TraceOutcome::Hit);
        Ok(instance)
    }

    fn lookup_definition(&self, ctx: &KernelContext) -> Result<Option<Candidate>> {
        let Some(definition) = self.definitions.get(ctx.service_id()) else {
            return Ok(None);
        };
        if let Some(cached) = self.cached(ctx, definition)? {
            debug!(service = %ctx.service_id(), lifetime = %definition.lifetime(), "Cache hit");
            return Ok(Some(Candidate::Existing(cached)));
        }
        Ok(Some(Candidate::Defined(
            definition.concrete().clone(),
            definition.lifetime(),
        )))
    }

    fn cached(&self, ctx: &KernelContext, definition: &ServiceDefinition) -> Result<Option<Instance>> {
        if ctx.is_fresh() {
            return Ok(None);
        }
        match definition.lifetime() {
            Lifetime::Singleton => Ok(self.core.singletons.get(definition.id())),
            Lifetime::Scoped => {
                let scopes = self.scopes.borrow();
                if scopes.active().is_none() {
                    return Err(Error::no_active_scope(definition.id()));
                }
                Ok(scopes.lookup(definition.id()))
            }
            Lifetime::Transient => Ok(None),
        }
    }

    fn autowire(&self, ctx: &KernelContext, state: &mut ResolutionState) -> Result<Candidate> {
        let id = ctx.service_id();
        if self.core.classes.is_instantiable(id) {
            self.record(*state, id, TraceOutcome::Hit);
            return Ok(Candidate::Autowired(id.to_string()));
        }

        self.record(*state, id, TraceOutcome::Miss);
        Self::advance(state, ResolutionState::NotFound)?;
        self.record(*state, id, TraceOutcome::Failed);
        Err(Error::service_not_found(id, ctx.chain()))
    }

    fn evaluate(&self, id: &str, candidate: Candidate) -> (Strategy, Option<Lifetime>) {
        match candidate {
            Candidate::Existing(instance) => (Strategy::Existing(instance), None),
            Candidate::Autowired(class) => (Strategy::Build(class), None),
            Candidate::Contextual(concrete) => (self.strategy_for(id, concrete), None),
            Candidate::Defined(concrete, lifetime) => {
                (self.strategy_for(id, concrete), Some(lifetime))
            }
        }
    }

    fn strategy_for(&self, id: &str, concrete: Concrete) -> Strategy {
        match concrete {
            Concrete::Instance(instance) => Strategy::Existing(instance),
            Concrete::Factory(factory) => Strategy::Invoke(factory),
            Concrete::Class(name) if name != id && self.definitions.has(&name) => {
                Strategy::Delegate(name)
            }
            Concrete::Class(name) => Strategy::Build(name),
        }
    }

    fn instantiate(&self, ctx: &KernelContext, strategy: Strategy) -> Result<Instance> {
        match strategy {
            Strategy::Existing(instance) => Ok(instance),
            Strategy::Build(class) => self.build(ctx, &class),
            Strategy::Delegate(target) => {
                debug!(service = %ctx.service_id(), target = %target, "Delegating resolution");
                let mut child = self
                    .core
                    .detector
                    .enter(ctx, &target)?
                    .with_overrides(ctx.overrides().clone());
                if ctx.is_fresh() {
                    child = child.fresh();
                }
                self.resolve(&child)
            }
            Strategy::Invoke(factory) => {
                let resolver = PipelineResolver::new(self, ctx);
                factory(&resolver)
            }
        }
    }

    fn build(&self, ctx: &KernelContext, class_name: &str) -> Result<Instance> {
        let class = self
            .core
            .classes
            .get(class_name)
            .ok_or_else(|| Error::service_not_found(class_name, &ctx.stack()))?;
        let prototype = self.core.prototypes.get_or_analyze(&class)?;

        let arguments =
            self.resolve_arguments(ctx, &prototype.class, &prototype.parameters, ctx.overrides())?;
        let instance = (prototype.constructor())(&arguments).map_err(|err| match err {
            err @ Error::AutoResolve { .. } => err,
            err => Error::auto_resolve_with_source(class_name, "constructor failed", err),
        })?;

        self.inject(ctx, &prototype, &instance)?;
        Ok(instance)
    }

    fn extend(&self, ctx: &KernelContext, instance: Instance) -> Result<Instance> {
        let extenders = self.definitions.extenders(ctx.service_id());
        if extenders.is_empty() {
            return Ok(instance);
        }
        let resolver = PipelineResolver::new(self, ctx);
        extenders
            .iter()
            .try_fold(instance, |current, extender| extender(current, &resolver))
    }

    fn apply_lifetime(
        &self,
        ctx: &KernelContext,
        lifetime: Option<Lifetime>,
        instance: Instance,
    ) -> Result<Instance> {
        if ctx.is_fresh() {
            return Ok(instance);
        }
        match lifetime {
            Some(Lifetime::Singleton) => Ok(self
                .core
                .singletons
                .insert_if_absent(ctx.service_id(), instance)),
            Some(Lifetime::Scoped) => self.scopes.borrow_mut().store(ctx.service_id(), instance),
            Some(Lifetime::Transient) | None => Ok(instance),
        }
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    fn advance(state: &mut ResolutionState, next: ResolutionState) -> Result<()> {
        if !state.can_transition_to(next) {
            return Err(Error::internal(format!(
                "illegal pipeline transition {state} -> {next}"
            )));
        }
        *state = next;
        Ok(())
    }

    fn record(&self, state: ResolutionState, id: &str, outcome: TraceOutcome) {
        debug!(service = %id, state = %state, outcome = ?outcome, "Pipeline transition");
        let next = self.trace.borrow().record(state, id, outcome);
        *self.trace.borrow_mut() = next;
    }

    /// A failure was handled by a fallback; forget its chain
    fn recover(&self) {
        self.failure_chain.borrow_mut().take();
    }
}
