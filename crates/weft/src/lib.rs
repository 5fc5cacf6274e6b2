//! # weft
//!
//! A dependency-injection resolution engine: it turns a service identifier
//! into a fully constructed, wired instance while enforcing lifetime policy,
//! detecting dependency cycles, caching per-class build plans and recording
//! resolution telemetry.
//!
//! ## Features
//!
//! - **Lifetimes**: transient, singleton and nested scoped instances
//! - **Autowiring**: classes are analyzed once into an immutable build plan
//! - **Contextual bindings**: `when(consumer).needs(dep).give(concrete)`
//! - **Diagnostics**: typed failures carrying the resolution chain, dry-run
//!   injection reports and a JSON metrics export
//!
//! ## Example
//!
//! ```
//! use weft::prelude::*;
//!
//! struct RequestContext;
//! impl Service for RequestContext {}
//!
//! let mut builder = Container::builder();
//! builder
//!     .class(ClassDescriptor::concrete("RequestContext", |_: &Arguments| Ok(RequestContext)))?
//!     .scoped("Ctx", "RequestContext")?;
//! let kernel = builder.build().kernel();
//!
//! let scope = kernel.enter_scope();
//! let first = kernel.get("Ctx")?;
//! let second = kernel.get("Ctx")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! drop(scope);
//! # Ok::<(), weft::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Definitions, prototypes, contexts, traces and the error taxonomy
//! - `application` - Registries, the resolution pipeline and scopes
//! - `infrastructure` - Configuration, logging and bootstrap

/// Domain layer - resolution engine types and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use weft_domain::*;
}

/// Application layer - container, kernel and registries
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use weft_application::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use weft_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the resolution surface at the crate root
pub use application::{
    Callable, Container, ContainerBuilder, InjectionReport, InjectionSource, Kernel,
    KernelSettings, MetricsSnapshot, ScopeGuard,
};

// Re-export boot entry points at the crate root
pub use infrastructure::{AppConfig, ConfigLoader, bootstrap, bootstrap_from_loader};

/// Everything needed to register and resolve services
pub mod prelude {
    pub use crate::application::{Callable, Container, ContainerBuilder, Kernel, ScopeGuard};
    pub use weft_domain::entities::{Arguments, ClassDescriptor, Concrete, ParameterDecl};
    pub use weft_domain::error::{Error, Result};
    pub use weft_domain::ports::{Instance, Service, ServiceResolver};
    pub use weft_domain::value_objects::{Lifetime, ScopeId};
}
