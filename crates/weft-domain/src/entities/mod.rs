//! Domain entities

pub mod arguments;
pub mod class;
pub mod context;
pub mod definition;
pub mod prototype;
pub mod trace;

pub use arguments::{Argument, Arguments};
pub use class::{
    ClassDescriptor, ClassKind, Constructor, InjectionPointDecl, Injector, ParameterDecl, TypeHint,
};
pub use context::KernelContext;
pub use definition::{Concrete, Extender, Factory, ServiceDefinition};
pub use prototype::{InjectionPlan, ParameterPlan, ParameterTarget, ServicePrototype};
pub use trace::{ResolutionTrace, TraceEntry, TraceOutcome};
