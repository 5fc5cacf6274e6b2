//! Service definitions and registration rules

pub mod contextual;
pub mod store;

pub use contextual::{ContextualBindingBuilder, ContextualNeeds};
pub use store::{DefinitionStore, DefinitionSummary};
