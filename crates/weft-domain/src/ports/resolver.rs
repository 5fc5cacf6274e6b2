//! Resolver Port
//!
//! The view of the container handed to factory closures and extenders. It
//! carries the parent chain of the resolution that invoked the factory, so
//! anything the factory resolves is cycle-checked against that chain.

use crate::entities::Arguments;
use crate::error::{Error, Result};
use crate::ports::service::{Instance, Service};
use std::sync::Arc;

/// Container access from inside a resolution
pub trait ServiceResolver {
    /// Resolve a dependency of the service currently being built
    fn get(&self, id: &str) -> Result<Instance>;

    /// Whether a definition exists for the identifier
    fn has(&self, id: &str) -> bool;

    /// Explicit parameters supplied to `make`, empty otherwise
    fn parameters(&self) -> &Arguments;

    /// Identifier of the service currently being built
    fn service_id(&self) -> &str;

    /// Ancestors of the service currently being built, outermost first
    fn chain(&self) -> &[String];
}

impl dyn ServiceResolver + '_ {
    /// Resolve a dependency and downcast it to `T`
    pub fn get_as<T: Service>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?
            .downcast_arc::<T>()
            .map_err(|_| Error::type_mismatch(id, std::any::type_name::<T>()))
    }
}
