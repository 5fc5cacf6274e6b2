//! Contextual binding builder
//!
//! `store.when("PaymentService").needs("HttpClient").give("HardenedClient")`

use crate::definitions::store::DefinitionStore;
use weft_domain::entities::Concrete;
use weft_domain::error::Result;

/// First half of a contextual rule: the consumer
pub struct ContextualBindingBuilder<'a> {
    store: &'a mut DefinitionStore,
    consumer: String,
}

impl<'a> ContextualBindingBuilder<'a> {
    pub(crate) fn new(store: &'a mut DefinitionStore, consumer: String) -> Self {
        Self { store, consumer }
    }

    /// Name the dependency being overridden
    pub fn needs<S: Into<String>>(self, dependency: S) -> ContextualNeeds<'a> {
        ContextualNeeds {
            store: self.store,
            consumer: self.consumer,
            dependency: dependency.into(),
        }
    }
}

/// Second half of a contextual rule: the dependency
pub struct ContextualNeeds<'a> {
    store: &'a mut DefinitionStore,
    consumer: String,
    dependency: String,
}

impl ContextualNeeds<'_> {
    /// Register what the consumer receives instead
    pub fn give<C: Into<Concrete>>(self, concrete: C) -> Result<()> {
        self.store
            .add_contextual(self.consumer, self.dependency, concrete)
    }
}
