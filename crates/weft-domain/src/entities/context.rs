//! Per-request resolution context
//!
//! Created fresh at the top of every `get`/`make`/`call` and passed by value
//! down the recursion. A child context is derived for each dependency; the
//! parent chain it carries is what cycle detection inspects.

use crate::constants::CHAIN_SEPARATOR;
use crate::entities::arguments::Arguments;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// State of one resolution step
#[derive(Debug, Clone)]
pub struct KernelContext {
    request_id: Uuid,
    service_id: String,
    chain: Vec<String>,
    depth: usize,
    metadata: BTreeMap<String, Value>,
    overrides: Arguments,
    fresh: bool,
}

impl KernelContext {
    /// Context for a new top-level request
    pub fn new<S: Into<String>>(service_id: S) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            service_id: service_id.into(),
            chain: Vec::new(),
            depth: 0,
            metadata: BTreeMap::new(),
            overrides: Arguments::new(),
            fresh: false,
        }
    }

    /// Context continuing an existing parent chain
    pub fn with_chain<S: Into<String>>(service_id: S, chain: Vec<String>) -> Self {
        let depth = chain.len();
        Self {
            chain,
            depth,
            ..Self::new(service_id)
        }
    }

    /// Context for a dependency of this one
    ///
    /// The current service becomes the last ancestor. Overrides and the
    /// cache-bypass flag only apply to the requested service, never to its
    /// dependencies.
    pub fn child<S: Into<String>>(&self, dependency: S) -> Self {
        let mut chain = self.chain.clone();
        chain.push(self.service_id.clone());
        Self {
            request_id: self.request_id,
            service_id: dependency.into(),
            chain,
            depth: self.depth + 1,
            metadata: BTreeMap::new(),
            overrides: Arguments::new(),
            fresh: false,
        }
    }

    /// Replace the explicit constructor arguments
    pub fn with_overrides(mut self, overrides: Arguments) -> Self {
        self.overrides = overrides;
        self
    }

    /// Bypass singleton and scoped caches for this service
    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }

    /// Attach a metadata entry
    pub fn annotate<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Identifier shared by every step of the top-level request
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Identifier being resolved
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Ancestors, outermost first
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Ancestors followed by the current service
    pub fn stack(&self) -> Vec<String> {
        let mut stack = self.chain.clone();
        stack.push(self.service_id.clone());
        stack
    }

    /// The service requesting this one, if any
    pub fn consumer(&self) -> Option<&str> {
        self.chain.last().map(String::as_str)
    }

    /// Nesting depth, zero at the top level
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the identifier is already being resolved further up
    pub fn is_ancestor(&self, id: &str) -> bool {
        self.chain.iter().any(|ancestor| ancestor == id)
    }

    /// Metadata annotations
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Explicit constructor arguments
    pub fn overrides(&self) -> &Arguments {
        &self.overrides
    }

    /// Whether caches are bypassed
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Human-readable stack, e.g. `A -> B -> C`
    pub fn describe(&self) -> String {
        self.stack().join(CHAIN_SEPARATOR)
    }
}
