//! Class Registry
//!
//! Every class the engine may autowire or build from a class-string concrete
//! is registered here at boot, keyed by name and by the Rust type it
//! produces. The second index is what lets `inject_into` find the descriptor
//! of an object it did not build.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use weft_domain::entities::ClassDescriptor;
use weft_domain::error::{Error, Result};

/// Known class descriptors
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    by_name: HashMap<String, Arc<ClassDescriptor>>,
    by_type: HashMap<TypeId, String>,
}

impl ClassRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any class of the same name
    pub fn register(&mut self, class: ClassDescriptor) -> Result<()> {
        let name = class.name().to_string();
        if name.trim().is_empty() {
            return Err(Error::configuration("class name cannot be empty"));
        }

        debug!(class = %name, kind = ?class.kind(), "Registering class");
        let type_id = class.type_id();
        if let Some(previous) = self.by_name.insert(name.clone(), Arc::new(class)) {
            warn!(class = %name, "Replacing existing class descriptor");
            if let Some(old_type) = previous.type_id().filter(|old| Some(*old) != type_id) {
                if self.by_type.get(&old_type) == Some(&name) {
                    self.by_type.remove(&old_type);
                }
            }
        }
        if let Some(type_id) = type_id {
            self.by_type.insert(type_id, name);
        }
        Ok(())
    }

    /// Descriptor registered under the name
    pub fn get(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.by_name.get(name).map(Arc::clone)
    }

    /// Descriptor whose constructor produces the given Rust type
    ///
    /// When several classes build the same type, the most recently
    /// registered one wins.
    pub fn for_type(&self, type_id: TypeId) -> Option<Arc<ClassDescriptor>> {
        self.by_type.get(&type_id).and_then(|name| self.get(name))
    }

    /// Whether a class of this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Whether a class of this name is registered and constructible
    pub fn is_instantiable(&self, name: &str) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|class| class.is_instantiable())
    }

    /// Registered class names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no class is registered
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
