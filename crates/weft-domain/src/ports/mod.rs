//! Ports
//!
//! Contracts between the engine and the code it wires:
//! - [`Service`]: what every resolvable value implements
//! - [`ServiceResolver`]: the container view handed to factories and extenders

pub mod resolver;
pub mod service;

pub use resolver::ServiceResolver;
pub use service::{Instance, Service, concrete_type_id, into_instance};
