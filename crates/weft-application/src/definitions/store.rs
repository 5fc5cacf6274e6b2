//! Definition Store
//!
//! Registry of abstract identifiers to concretes, lifetimes, tags, contextual
//! rules and extenders. Mutated only while the container is being built;
//! afterwards it is shared read-only behind an `Arc`.

use crate::definitions::contextual::ContextualBindingBuilder;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};
use weft_domain::entities::{Concrete, Extender, ServiceDefinition};
use weft_domain::error::{Error, Result};
use weft_domain::ports::{Instance, ServiceResolver};
use weft_domain::value_objects::Lifetime;

/// Registered bindings and rules
#[derive(Clone, Default)]
pub struct DefinitionStore {
    definitions: HashMap<String, ServiceDefinition>,
    extenders: HashMap<String, Vec<Extender>>,
    tags: BTreeMap<String, Vec<String>>,
    contextual: HashMap<String, HashMap<String, Concrete>>,
}

/// Diagnostic view of one definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionSummary {
    /// Abstract identifier
    pub id: String,
    /// `class`, `factory` or `instance`
    pub concrete: String,
    /// Class name for class concretes
    pub class: Option<String>,
    /// Lifetime
    pub lifetime: Lifetime,
    /// Tags carried by the identifier
    pub tags: Vec<String>,
    /// Number of registered extenders
    pub extenders: usize,
}

fn require_id(id: &str, what: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::configuration(format!("{what} cannot be empty")));
    }
    Ok(())
}

impl DefinitionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Bind an identifier to a concrete with the given lifetime
    ///
    /// Re-binding replaces the previous definition. A pre-built instance
    /// is never constructed, so it cannot be owned by a scope.
    pub fn bind<S, C>(&mut self, id: S, concrete: C, lifetime: Lifetime) -> Result<()>
    where
        S: Into<String>,
        C: Into<Concrete>,
    {
        let id = id.into();
        require_id(&id, "service id")?;
        let concrete = concrete.into();
        match &concrete {
            Concrete::Class(name) => require_id(name, "class name")?,
            Concrete::Instance(_) if lifetime == Lifetime::Scoped => {
                return Err(Error::configuration(format!(
                    "pre-built instance '{id}' cannot have a scoped lifetime"
                )));
            }
            _ => {}
        }

        debug!(id = %id, concrete = concrete.kind(), lifetime = %lifetime, "Binding service");
        let definition = ServiceDefinition::new(id.clone(), concrete, lifetime);
        if self.definitions.insert(id.clone(), definition).is_some() {
            warn!(id = %id, "Replacing existing service definition");
        }
        Ok(())
    }

    /// Bind with a singleton lifetime
    pub fn singleton<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<()> {
        self.bind(id, concrete, Lifetime::Singleton)
    }

    /// Bind with a scoped lifetime
    pub fn scoped<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<()> {
        self.bind(id, concrete, Lifetime::Scoped)
    }

    /// Bind with a transient lifetime
    pub fn transient<S: Into<String>, C: Into<Concrete>>(&mut self, id: S, concrete: C) -> Result<()> {
        self.bind(id, concrete, Lifetime::Transient)
    }

    /// Register a pre-built instance
    pub fn instance<S: Into<String>>(&mut self, id: S, instance: Instance) -> Result<()> {
        self.bind(id, Concrete::Instance(instance), Lifetime::Singleton)
    }

    /// Register a decorator applied after every construction of `id`
    ///
    /// Extenders run in registration order. The identifier does not need a
    /// definition of its own; autowired classes are extended too.
    pub fn extend<S, F>(&mut self, id: S, extender: F) -> Result<()>
    where
        S: Into<String>,
        F: Fn(Instance, &dyn ServiceResolver) -> Result<Instance> + Send + Sync + 'static,
    {
        let id = id.into();
        require_id(&id, "service id")?;
        let extender: Extender = Arc::new(extender);
        self.extenders.entry(id).or_default().push(extender);
        Ok(())
    }

    /// Start a contextual rule for `consumer`
    pub fn when<S: Into<String>>(&mut self, consumer: S) -> ContextualBindingBuilder<'_> {
        ContextualBindingBuilder::new(self, consumer.into())
    }

    /// Register a contextual rule directly
    pub fn add_contextual<S, D, C>(&mut self, consumer: S, dependency: D, concrete: C) -> Result<()>
    where
        S: Into<String>,
        D: Into<String>,
        C: Into<Concrete>,
    {
        let consumer = consumer.into();
        let dependency = dependency.into();
        require_id(&consumer, "contextual consumer id")?;
        require_id(&dependency, "contextual dependency id")?;
        let concrete = concrete.into();
        if let Concrete::Class(name) = &concrete {
            require_id(name, "contextual class name")?;
        }

        debug!(consumer = %consumer, dependency = %dependency, "Adding contextual binding");
        self.contextual
            .entry(consumer)
            .or_default()
            .insert(dependency, concrete);
        Ok(())
    }

    /// Attach every tag to every identifier
    ///
    /// Tag membership keeps first-registration order and ignores duplicates.
    pub fn tag<I, T>(&mut self, ids: I, tags: T) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        for id in &ids {
            require_id(id, "tagged service id")?;
        }
        for tag in &tags {
            require_id(tag, "tag")?;
        }

        for tag in tags {
            let members = self.tags.entry(tag).or_default();
            for id in &ids {
                if !members.contains(id) {
                    members.push(id.clone());
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Whether a definition exists for the identifier
    pub fn has(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Definition registered for the identifier
    pub fn get(&self, id: &str) -> Option<&ServiceDefinition> {
        self.definitions.get(id)
    }

    /// Consumer-specific override for a dependency
    pub fn contextual(&self, consumer: &str, dependency: &str) -> Option<&Concrete> {
        self.contextual
            .get(consumer)
            .and_then(|rules| rules.get(dependency))
    }

    /// Extenders for the identifier, in registration order
    pub fn extenders(&self, id: &str) -> &[Extender] {
        self.extenders
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Identifiers carrying the tag, in registration order
    pub fn tagged(&self, tag: &str) -> &[String] {
        self.tags
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Tags carried by the identifier
    pub fn tags_of(&self, id: &str) -> Vec<String> {
        self.tags
            .iter()
            .filter(|(_, members)| members.iter().any(|member| member == id))
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definition is registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Diagnostic summaries of every definition, sorted by identifier
    pub fn summaries(&self) -> Vec<DefinitionSummary> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.definitions.get(id))
            .map(|definition| DefinitionSummary {
                id: definition.id().to_string(),
                concrete: definition.concrete().kind().to_string(),
                class: definition.concrete().class_name().map(str::to_string),
                lifetime: definition.lifetime(),
                tags: self.tags_of(definition.id()),
                extenders: self.extenders(definition.id()).len(),
            })
            .collect()
    }
}

impl std::fmt::Debug for DefinitionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionStore")
            .field("definitions", &self.definitions.len())
            .field("extenders", &self.extenders.len())
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .field("contextual", &self.contextual.len())
            .finish()
    }
}
