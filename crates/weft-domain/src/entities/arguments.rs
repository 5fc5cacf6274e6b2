//! Constructor and callable arguments
//!
//! An ordered, name-addressed list of values. The pipeline fills one per
//! constructor call; callers supply one to `make` and `call` as overrides.

use crate::error::{Error, Result};
use crate::ports::{Instance, Service};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single argument value
#[derive(Clone)]
pub enum Argument {
    /// A resolved (or caller-supplied) service instance
    Service(Instance),
    /// A plain value, such as a parameter default
    Value(Value),
}

impl Argument {
    /// The `null` value, used for optional parameters with no default
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Whether this argument is the `null` value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(_) => f.write_str("Service(..)"),
            Self::Value(value) => write!(f, "Value({value})"),
        }
    }
}

impl From<Instance> for Argument {
    fn from(instance: Instance) -> Self {
        Self::Service(instance)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Ordered named arguments
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
    positions: HashMap<String, usize>,
}

impl Arguments {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<S: Into<String>, A: Into<Argument>>(mut self, name: S, argument: A) -> Self {
        self.insert(name, argument);
        self
    }

    /// Builder-style insert of a concrete service value
    pub fn with_service<S: Into<String>, T: Service>(self, name: S, value: T) -> Self {
        let instance: Instance = Arc::new(value);
        self.with(name, instance)
    }

    /// Insert or replace an argument, keeping the original position on replace
    pub fn insert<S: Into<String>, A: Into<Argument>>(&mut self, name: S, argument: A) {
        let name = name.into();
        let argument = argument.into();
        match self.positions.get(&name) {
            Some(&position) => self.entries[position].1 = argument,
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, argument));
            }
        }
    }

    /// Look up an argument by name
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.positions
            .get(name)
            .map(|&position| &self.entries[position].1)
    }

    /// Whether an argument with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Argument names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, argument)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }

    /// Required service argument
    pub fn service(&self, name: &str) -> Result<Instance> {
        match self.get(name) {
            Some(Argument::Service(instance)) => Ok(Arc::clone(instance)),
            Some(Argument::Value(_)) => Err(Error::invalid_argument(format!(
                "argument '{name}' is a value, not a service"
            ))),
            None => Err(Error::invalid_argument(format!(
                "missing argument '{name}'"
            ))),
        }
    }

    /// Required service argument downcast to `T`
    pub fn service_as<T: Service>(&self, name: &str) -> Result<Arc<T>> {
        self.service(name)?
            .downcast_arc::<T>()
            .map_err(|_| Error::type_mismatch(name, std::any::type_name::<T>()))
    }

    /// Optional service argument; `null` and absent both map to `None`
    pub fn optional_service(&self, name: &str) -> Result<Option<Instance>> {
        match self.get(name) {
            Some(Argument::Service(instance)) => Ok(Some(Arc::clone(instance))),
            Some(Argument::Value(Value::Null)) | None => Ok(None),
            Some(Argument::Value(_)) => Err(Error::invalid_argument(format!(
                "argument '{name}' is a value, not a service"
            ))),
        }
    }

    /// Required plain value argument
    pub fn value(&self, name: &str) -> Result<&Value> {
        match self.get(name) {
            Some(Argument::Value(value)) => Ok(value),
            Some(Argument::Service(_)) => Err(Error::invalid_argument(format!(
                "argument '{name}' is a service, not a value"
            ))),
            None => Err(Error::invalid_argument(format!(
                "missing argument '{name}'"
            ))),
        }
    }

    /// Deserialize a plain value argument into `T`
    pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?.clone();
        serde_json::from_value(value).map_err(|e| {
            Error::invalid_argument(format!("argument '{name}' has the wrong shape: {e}"))
        })
    }
}
