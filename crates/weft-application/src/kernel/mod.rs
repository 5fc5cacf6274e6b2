//! Container, kernel and the resolution pipeline

pub mod callable;
pub mod container;
pub mod handle;
pub mod inspect;
mod pipeline;
mod resolver;
pub mod settings;

pub use callable::Callable;
pub use container::{Container, ContainerBuilder};
pub use handle::{Kernel, ScopeGuard};
pub use inspect::{InjectionPointReport, InjectionReport, InjectionSource, ParameterReport};
pub use settings::KernelSettings;
