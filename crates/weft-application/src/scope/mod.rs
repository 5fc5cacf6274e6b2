//! Scope Manager
//!
//! Nested lifetime scopes, owned by one unit of work. Frames form a stack;
//! the innermost frame is authoritative for scoped lookups and is the only
//! frame that may be ended.
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `begin` | push a frame whose parent is the previous innermost |
//! | `end` | dispose the innermost frame's instances, newest first, then pop |
//! | `lookup` / `store` | read / write the innermost frame |

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use weft_domain::error::{Error, Result};
use weft_domain::ports::Instance;
use weft_domain::value_objects::ScopeId;

/// One scope frame
pub struct Scope {
    id: ScopeId,
    parent: Option<ScopeId>,
    instances: HashMap<String, Instance>,
    order: Vec<String>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            parent,
            instances: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Frame identifier
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Enclosing frame, if any
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Number of instances owned by the frame
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the frame owns no instance
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Dispose owned instances in reverse insertion order
    ///
    /// An instance stored under several identifiers is disposed once.
    fn dispose(self) -> usize {
        let Self {
            mut instances,
            order,
            ..
        } = self;
        let mut disposed: Vec<*const ()> = Vec::with_capacity(order.len());
        for id in order.iter().rev() {
            if let Some(instance) = instances.remove(id) {
                let identity = Arc::as_ptr(&instance).cast::<()>();
                if !disposed.contains(&identity) {
                    instance.dispose();
                    disposed.push(identity);
                }
            }
        }
        disposed.len()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("services", &self.order)
            .finish()
    }
}

/// Stack of scope frames
#[derive(Debug)]
pub struct ScopeManager {
    frames: Vec<Scope>,
    ids: Arc<AtomicU64>,
}

impl ScopeManager {
    /// Manager with its own id sequence
    pub fn new() -> Self {
        Self::with_id_source(Arc::new(AtomicU64::new(0)))
    }

    /// Manager drawing ids from a shared sequence
    ///
    /// Kernels of one container share the sequence so scope ids are never
    /// reused while the container lives.
    pub fn with_id_source(ids: Arc<AtomicU64>) -> Self {
        Self {
            frames: Vec::new(),
            ids,
        }
    }

    /// Push a new innermost frame
    pub fn begin(&mut self) -> ScopeId {
        let id = ScopeId::new(self.ids.fetch_add(1, Ordering::Relaxed) + 1);
        let parent = self.active();
        self.frames.push(Scope::new(id, parent));
        info!(scope = %id, depth = self.frames.len(), "Scope started");
        id
    }

    /// Dispose and pop the innermost frame, which must be `id`
    ///
    /// Returns the number of instances disposed.
    pub fn end(&mut self, id: ScopeId) -> Result<usize> {
        match self.frames.last() {
            Some(innermost) if innermost.id() == id => {}
            Some(innermost) if self.frames.iter().any(|frame| frame.id() == id) => {
                return Err(Error::scope(format!(
                    "cannot end {id}: {} is still active inside it",
                    innermost.id()
                )));
            }
            _ => return Err(Error::scope(format!("{id} is not an active scope"))),
        }

        let frame = self
            .frames
            .pop()
            .ok_or_else(|| Error::internal("scope stack emptied during end"))?;
        let disposed = frame.dispose();
        info!(scope = %id, disposed, "Scope ended");
        Ok(disposed)
    }

    /// Innermost frame id
    pub fn active(&self) -> Option<ScopeId> {
        self.frames.last().map(Scope::id)
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether `id` is an open frame
    pub fn is_open(&self, id: ScopeId) -> bool {
        self.frames.iter().any(|frame| frame.id() == id)
    }

    /// Instance cached for `service` in the innermost frame
    pub fn lookup(&self, service: &str) -> Option<Instance> {
        self.frames
            .last()
            .and_then(|frame| frame.instances.get(service))
            .map(Arc::clone)
    }

    /// Cache an instance in the innermost frame
    ///
    /// If the frame already holds one for `service`, that one is kept and
    /// returned.
    pub fn store(&mut self, service: &str, instance: Instance) -> Result<Instance> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| Error::no_active_scope(service))?;
        if let Some(existing) = frame.instances.get(service) {
            return Ok(Arc::clone(existing));
        }
        debug!(scope = %frame.id, service = %service, "Caching scoped instance");
        frame.instances.insert(service.to_string(), Arc::clone(&instance));
        frame.order.push(service.to_string());
        Ok(instance)
    }

    /// Dispose every open frame, innermost first
    pub fn dispose_all(&mut self) -> usize {
        let mut disposed = 0;
        while let Some(frame) = self.frames.pop() {
            debug!(scope = %frame.id, "Disposing open scope");
            disposed += frame.dispose();
        }
        disposed
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}
