//! Service definitions

use crate::error::Result;
use crate::ports::{Instance, Service, ServiceResolver};
use crate::value_objects::Lifetime;
use std::fmt;
use std::sync::Arc;

/// Factory closure; receives the container view of the current resolution
pub type Factory = Arc<dyn Fn(&dyn ServiceResolver) -> Result<Instance> + Send + Sync>;

/// Post-construction decorator
pub type Extender = Arc<dyn Fn(Instance, &dyn ServiceResolver) -> Result<Instance> + Send + Sync>;

/// What a definition (or contextual rule) produces
#[derive(Clone)]
pub enum Concrete {
    /// Class name, built from its descriptor or delegated to its own definition
    Class(String),
    /// Factory closure
    Factory(Factory),
    /// Pre-built instance
    Instance(Instance),
}

impl Concrete {
    /// Class-name concrete
    pub fn class<S: Into<String>>(name: S) -> Self {
        Self::Class(name.into())
    }

    /// Factory concrete
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<Instance> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// Pre-built instance concrete
    pub fn instance<T: Service>(value: T) -> Self {
        Self::Instance(Arc::new(value))
    }

    /// Short label used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Factory(_) => "factory",
            Self::Instance(_) => "instance",
        }
    }

    /// Class name, for class concretes
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Concrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl From<&str> for Concrete {
    fn from(name: &str) -> Self {
        Self::Class(name.to_string())
    }
}

impl From<String> for Concrete {
    fn from(name: String) -> Self {
        Self::Class(name)
    }
}

impl From<Instance> for Concrete {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

/// The registered recipe for one identifier
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    id: String,
    concrete: Concrete,
    lifetime: Lifetime,
}

impl ServiceDefinition {
    /// Create a definition
    pub fn new<S: Into<String>>(id: S, concrete: Concrete, lifetime: Lifetime) -> Self {
        Self {
            id: id.into(),
            concrete,
            lifetime,
        }
    }

    /// Abstract identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// What the definition produces
    pub fn concrete(&self) -> &Concrete {
        &self.concrete
    }

    /// How long produced instances are reused
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}
