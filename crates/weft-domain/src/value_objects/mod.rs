//! Value objects
//!
//! Small immutable types compared by value.

pub mod lifetime;
pub mod scope_id;
pub mod state;

pub use lifetime::Lifetime;
pub use scope_id::ScopeId;
pub use state::ResolutionState;
