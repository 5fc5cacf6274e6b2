//! Service Port
//!
//! Every value the engine hands out is an `Arc<dyn Service>`. The trait is a
//! `downcast-rs` sync trait, so callers recover the concrete type with
//! `downcast_arc::<T>()` or `downcast_ref::<T>()`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_domain::ports::{Instance, Service};
//!
//! struct ConsoleLogger;
//! impl Service for ConsoleLogger {}
//!
//! let instance: Instance = Arc::new(ConsoleLogger);
//! assert!(instance.is::<ConsoleLogger>());
//! ```

use downcast_rs::{Downcast, DowncastSync, impl_downcast};
use std::any::TypeId;
use std::sync::Arc;

/// A resolvable, shareable service value
pub trait Service: DowncastSync {
    /// Release resources when the owning scope ends
    ///
    /// Called at most once per scoped instance.
    fn dispose(&self) {}
}

impl_downcast!(sync Service);

impl std::fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service").finish_non_exhaustive()
    }
}

/// Type-erased resolved instance
pub type Instance = Arc<dyn Service>;

/// Wrap a concrete value into an [`Instance`]
pub fn into_instance<T: Service>(value: T) -> Instance {
    Arc::new(value)
}

/// `TypeId` of the concrete value behind a service reference
pub fn concrete_type_id(service: &dyn Service) -> TypeId {
    Downcast::as_any(service).type_id()
}
