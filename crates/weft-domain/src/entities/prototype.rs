//! Service prototypes
//!
//! The immutable build plan derived once per class. Two prototypes of the
//! same class compare equal; the constructor and injector closures are not
//! part of the comparison.

use crate::entities::class::{Constructor, Injector, TypeHint};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// How the engine will supply a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ParameterTarget {
    /// Resolve this identifier through the pipeline
    Service(String),
    /// Use the default value, or `null` for optional parameters
    Value,
    /// Nothing can be supplied unless the caller passes it explicitly
    Unresolvable,
}

/// Analyzed constructor or callable parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterPlan {
    /// Parameter name
    pub name: String,
    /// Zero-based position
    pub position: usize,
    /// Declared type
    pub declared: Option<TypeHint>,
    /// Resolution target
    pub target: ParameterTarget,
    /// Whether `null` is acceptable
    pub optional: bool,
    /// Default value
    pub default: Option<Value>,
    /// Identifier requested by an injection hint, overriding the declared type
    pub hint: Option<String>,
}

impl ParameterPlan {
    /// Identifier to resolve, if the parameter is a service dependency
    pub fn dependency(&self) -> Option<&str> {
        match &self.target {
            ParameterTarget::Service(id) => Some(id),
            _ => None,
        }
    }

    /// Value to use when no service can be supplied
    pub fn fallback(&self) -> Option<Value> {
        match (&self.default, self.optional) {
            (Some(default), _) => Some(default.clone()),
            (None, true) => Some(Value::Null),
            (None, false) => None,
        }
    }
}

/// Analyzed injection point
#[derive(Clone, Serialize)]
pub struct InjectionPlan {
    /// Property or setter name
    pub name: String,
    /// Identifier to inject
    pub target: String,
    /// Skip when the target is missing
    pub optional: bool,
    #[serde(skip)]
    pub(crate) injector: Injector,
}

impl InjectionPlan {
    /// Create a plan
    pub fn new(name: String, target: String, optional: bool, injector: Injector) -> Self {
        Self {
            name,
            target,
            optional,
            injector,
        }
    }

    /// Closure applying the dependency
    pub fn injector(&self) -> &Injector {
        &self.injector
    }
}

impl PartialEq for InjectionPlan {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.target == other.target && self.optional == other.optional
    }
}

impl fmt::Debug for InjectionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPlan")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Immutable build plan for one concrete class
#[derive(Clone, Serialize)]
pub struct ServicePrototype {
    /// Class name
    pub class: String,
    /// Constructor parameters in declaration order
    pub parameters: Vec<ParameterPlan>,
    /// Property/setter injection points
    pub injection_points: Vec<InjectionPlan>,
    #[serde(skip)]
    pub(crate) constructor: Constructor,
}

impl ServicePrototype {
    /// Create a prototype
    pub fn new(
        class: String,
        parameters: Vec<ParameterPlan>,
        injection_points: Vec<InjectionPlan>,
        constructor: Constructor,
    ) -> Self {
        Self {
            class,
            parameters,
            injection_points,
            constructor,
        }
    }

    /// Constructor closure
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Identifiers the constructor depends on, in order
    pub fn dependencies(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter_map(ParameterPlan::dependency)
            .collect()
    }
}

impl PartialEq for ServicePrototype {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.parameters == other.parameters
            && self.injection_points == other.injection_points
    }
}

impl fmt::Debug for ServicePrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrototype")
            .field("class", &self.class)
            .field("parameters", &self.parameters)
            .field("injection_points", &self.injection_points)
            .finish_non_exhaustive()
    }
}
