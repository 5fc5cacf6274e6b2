//! Class descriptors
//!
//! Rust has no runtime reflection, so every class the engine may build is
//! described once, at boot, by a [`ClassDescriptor`]: its constructor
//! parameters in order, its property/setter injection points, contextual
//! hints, and the constructor closure itself. The prototype analyzer turns a
//! descriptor into an immutable build plan.
//!
//! ## Example
//!
//! ```
//! use weft_domain::entities::{ClassDescriptor, ParameterDecl};
//! use weft_domain::ports::Service;
//!
//! struct Mailer { retries: u32 }
//! impl Service for Mailer {}
//!
//! let class = ClassDescriptor::concrete("Mailer", |args| {
//!     Ok(Mailer { retries: args.parse("retries")? })
//! })
//! .param(ParameterDecl::builtin("retries", "int").default_value(3));
//!
//! assert!(class.is_instantiable());
//! ```

use crate::entities::arguments::Arguments;
use crate::error::{Error, Result};
use crate::ports::{Instance, Service};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds an instance from resolved arguments
pub type Constructor = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

/// Applies one injected dependency to an already-built instance
pub type Injector = Arc<dyn Fn(&dyn Service, Instance) -> Result<()> + Send + Sync>;

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum TypeHint {
    /// A class or interface name (a service identifier)
    Class(String),
    /// A scalar or other non-service type
    Builtin(String),
    /// Any of several types
    Union(Vec<TypeHint>),
}

impl TypeHint {
    /// Class-shaped hint
    pub fn class<S: Into<String>>(name: S) -> Self {
        Self::Class(name.into())
    }

    /// Builtin hint
    pub fn builtin<S: Into<String>>(name: S) -> Self {
        Self::Builtin(name.into())
    }

    /// First class-shaped member, searching unions depth first
    pub fn first_class(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Builtin(_) => None,
            Self::Union(members) => members.iter().find_map(TypeHint::first_class),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) | Self::Builtin(name) => f.write_str(name),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

/// One declared constructor or callable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name
    pub name: String,
    /// Declared type, if any
    pub type_hint: Option<TypeHint>,
    /// Whether the parameter accepts `null`
    pub optional: bool,
    /// Default value, if any
    pub default: Option<Value>,
    /// Identifier to inject instead of the declared type
    pub inject: Option<String>,
}

impl ParameterDecl {
    /// Untyped parameter
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            optional: false,
            default: None,
            inject: None,
        }
    }

    /// Parameter typed with a class name
    pub fn service<S: Into<String>, C: Into<String>>(name: S, class: C) -> Self {
        Self::new(name).typed(TypeHint::class(class))
    }

    /// Parameter typed with a builtin type
    pub fn builtin<S: Into<String>, T: Into<String>>(name: S, ty: T) -> Self {
        Self::new(name).typed(TypeHint::builtin(ty))
    }

    /// Set the declared type
    pub fn typed(mut self, hint: TypeHint) -> Self {
        self.type_hint = Some(hint);
        self
    }

    /// Accept `null` when nothing else can be supplied
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set a default value
    pub fn default_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Inject the given identifier instead of the declared type
    pub fn inject<S: Into<String>>(mut self, id: S) -> Self {
        self.inject = Some(id.into());
        self
    }
}

/// Whether a class can be constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Constructible class
    Concrete,
    /// Abstract class, never constructed directly
    Abstract,
    /// Interface, never constructed directly
    Interface,
}

/// A property or setter that receives a dependency after construction
#[derive(Clone)]
pub struct InjectionPointDecl {
    /// Property or setter name
    pub name: String,
    /// Identifier to inject
    pub target: String,
    /// Skip silently when the target cannot be found
    pub optional: bool,
    /// Applies the resolved dependency
    pub injector: Injector,
}

impl fmt::Debug for InjectionPointDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPointDecl")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Structural description of one class
#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    kind: ClassKind,
    type_id: Option<TypeId>,
    type_name: Option<&'static str>,
    parameters: Vec<ParameterDecl>,
    injection_points: Vec<InjectionPointDecl>,
    hints: BTreeMap<String, String>,
    constructor: Option<Constructor>,
}

impl ClassDescriptor {
    /// A constructible class producing `T`
    pub fn concrete<S, T, F>(name: S, constructor: F) -> Self
    where
        S: Into<String>,
        T: Service,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(move |args: &Arguments| {
            let instance: Instance = Arc::new(constructor(args)?);
            Ok(instance)
        });
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            type_id: Some(TypeId::of::<T>()),
            type_name: Some(std::any::type_name::<T>()),
            parameters: Vec::new(),
            injection_points: Vec::new(),
            hints: BTreeMap::new(),
            constructor: Some(constructor),
        }
    }

    /// An interface: known to the engine, never constructed
    pub fn interface<S: Into<String>>(name: S) -> Self {
        Self::non_instantiable(name, ClassKind::Interface)
    }

    /// An abstract class: known to the engine, never constructed
    pub fn abstract_class<S: Into<String>>(name: S) -> Self {
        Self::non_instantiable(name, ClassKind::Abstract)
    }

    fn non_instantiable<S: Into<String>>(name: S, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_id: None,
            type_name: None,
            parameters: Vec::new(),
            injection_points: Vec::new(),
            hints: BTreeMap::new(),
            constructor: None,
        }
    }

    /// Append a constructor parameter
    pub fn param(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Class-level contextual hint: inject `id` into `parameter`
    pub fn hint<P: Into<String>, S: Into<String>>(mut self, parameter: P, id: S) -> Self {
        self.hints.insert(parameter.into(), id.into());
        self
    }

    /// Declare a property/setter injection point on `T`
    pub fn inject_into<T, N, S, F>(self, name: N, target: S, apply: F) -> Self
    where
        T: Service,
        N: Into<String>,
        S: Into<String>,
        F: Fn(&T, Instance) -> Result<()> + Send + Sync + 'static,
    {
        self.injection_point::<T, N, S, F>(name, target, false, apply)
    }

    /// Declare an injection point that is skipped when the target is missing
    pub fn inject_optional<T, N, S, F>(self, name: N, target: S, apply: F) -> Self
    where
        T: Service,
        N: Into<String>,
        S: Into<String>,
        F: Fn(&T, Instance) -> Result<()> + Send + Sync + 'static,
    {
        self.injection_point::<T, N, S, F>(name, target, true, apply)
    }

    fn injection_point<T, N, S, F>(mut self, name: N, target: S, optional: bool, apply: F) -> Self
    where
        T: Service,
        N: Into<String>,
        S: Into<String>,
        F: Fn(&T, Instance) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let point = name.clone();
        let injector: Injector = Arc::new(move |object: &dyn Service, dependency: Instance| {
            let target = object.downcast_ref::<T>().ok_or_else(|| {
                Error::type_mismatch(point.clone(), std::any::type_name::<T>())
            })?;
            apply(target, dependency)
        });
        self.injection_points.push(InjectionPointDecl {
            name,
            target: target.into(),
            optional,
            injector,
        });
        self
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class kind
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Rust type produced by the constructor
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// Rust type name produced by the constructor
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    /// Declared constructor parameters
    pub fn parameters(&self) -> &[ParameterDecl] {
        &self.parameters
    }

    /// Declared injection points
    pub fn injection_points(&self) -> &[InjectionPointDecl] {
        &self.injection_points
    }

    /// Class-level contextual hints
    pub fn hints(&self) -> &BTreeMap<String, String> {
        &self.hints
    }

    /// Constructor closure, absent for interfaces and abstract classes
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Whether the class can be constructed
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Concrete && self.constructor.is_some()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("parameters", &self.parameters)
            .field("injection_points", &self.injection_points)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}
