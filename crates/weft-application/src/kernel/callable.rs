//! Callables resolved through the kernel
//!
//! A callable declares its parameters the same way a class constructor
//! does; `Kernel::call` resolves them and invokes the body.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use weft_domain::entities::{Arguments, ParameterDecl};
use weft_domain::error::Result;
use weft_domain::ports::Instance;

type Body<R> = Arc<dyn Fn(&Arguments) -> Result<R> + Send + Sync>;

/// A named function with declared parameters
pub struct Callable<R = Instance> {
    name: String,
    parameters: Vec<ParameterDecl>,
    hints: BTreeMap<String, String>,
    body: Body<R>,
}

impl<R> Callable<R> {
    /// Create a callable with no parameters
    pub fn new<S, F>(name: S, body: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Arguments) -> Result<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            hints: BTreeMap::new(),
            body: Arc::new(body),
        }
    }

    /// Append a parameter
    pub fn param(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Inject `id` into `parameter`
    pub fn hint<P: Into<String>, S: Into<String>>(mut self, parameter: P, id: S) -> Self {
        self.hints.insert(parameter.into(), id.into());
        self
    }

    /// Name used as the consumer for contextual rules
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters
    pub fn parameters(&self) -> &[ParameterDecl] {
        &self.parameters
    }

    /// Parameter hints
    pub fn hints(&self) -> &BTreeMap<String, String> {
        &self.hints
    }

    pub(crate) fn invoke(&self, arguments: &Arguments) -> Result<R> {
        (self.body)(arguments)
    }
}

impl<R> Clone for Callable<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            hints: self.hints.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<R> fmt::Debug for Callable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}
