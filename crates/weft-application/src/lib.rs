//! Application Layer - weft resolution engine
//!
//! This crate turns a service identifier into a fully constructed, wired
//! instance. It owns every registry the engine reads during resolution and
//! the staged pipeline that reads them.
//!
//! ## Architecture
//!
//! ```text
//! ContainerBuilder ──build()──▶ Container (Send + Sync, shared)
//!                                   │
//!                               kernel()
//!                                   ▼
//!                      Kernel (per unit of work, owns scopes)
//!                                   │
//!                     ResolutionPipeline (per request)
//!        ┌──────────────┬───────────┼────────────┬──────────────┐
//!        ▼              ▼           ▼            ▼              ▼
//!  DefinitionStore  ClassRegistry  PrototypeCache  CycleDetector  ScopeManager
//!                                   │
//!                           TelemetryCollector (observes only)
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`definitions`] | Bindings, lifetimes, tags, contextual rules, extenders |
//! | [`classes`] | Class descriptors available for autowiring |
//! | [`prototype`] | One-time analysis of a class into a build plan |
//! | [`graph`] | In-flight cycle detection and depth guard |
//! | [`scope`] | Nested lifetime scopes |
//! | [`singleton`] | Container-wide singleton instances |
//! | [`telemetry`] | Trace aggregation and metrics export |
//! | [`kernel`] | Container, kernel and the resolution pipeline |

pub mod classes;
pub mod definitions;
pub mod graph;
pub mod kernel;
pub mod prototype;
pub mod scope;
pub mod singleton;
pub mod telemetry;

pub use classes::ClassRegistry;
pub use definitions::{ContextualBindingBuilder, DefinitionStore, DefinitionSummary};
pub use graph::CycleDetector;
pub use kernel::{
    Callable, Container, ContainerBuilder, InjectionReport, InjectionSource, Kernel,
    KernelSettings, ScopeGuard,
};
pub use prototype::{PrototypeAnalyzer, PrototypeCache};
pub use scope::{Scope, ScopeManager};
pub use singleton::SingletonRegistry;
pub use telemetry::{MetricsSnapshot, TelemetryCollector};
