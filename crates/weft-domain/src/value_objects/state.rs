//! Resolution pipeline states
//!
//! Used both as the pipeline's FSM marker and as the telemetry tag of every
//! trace entry. The transition table is strict:
//!
//! ```text
//! ContextualLookup -> DefinitionLookup -> Autowire -> Evaluate -> Instantiate -> Success
//! ContextualLookup -> Evaluate            (contextual override hit)
//! Autowire -> NotFound
//! Instantiate -> NotFound
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the resolution pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// Consumer-specific override lookup
    ContextualLookup,
    /// Registered definition lookup
    DefinitionLookup,
    /// Class-name fallback when nothing is registered
    Autowire,
    /// Normalization of the candidate into a construction strategy
    Evaluate,
    /// Construction, injection and extenders
    Instantiate,
    /// Terminal: an instance was produced
    Success,
    /// Terminal: nothing could be produced
    NotFound,
}

impl ResolutionState {
    /// Every state, in pipeline order
    pub const ALL: [ResolutionState; 7] = [
        Self::ContextualLookup,
        Self::DefinitionLookup,
        Self::Autowire,
        Self::Evaluate,
        Self::Instantiate,
        Self::Success,
        Self::NotFound,
    ];

    /// States reachable from `self` in one step
    pub fn successors(self) -> &'static [ResolutionState] {
        match self {
            Self::ContextualLookup => &[Self::DefinitionLookup, Self::Evaluate],
            Self::DefinitionLookup => &[Self::Autowire],
            Self::Autowire => &[Self::Evaluate, Self::NotFound],
            Self::Evaluate => &[Self::Instantiate],
            Self::Instantiate => &[Self::Success, Self::NotFound],
            Self::Success | Self::NotFound => &[],
        }
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: ResolutionState) -> bool {
        self.successors().contains(&next)
    }

    /// Terminal states are stable: the pipeline never re-enters from them
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::NotFound)
    }

    /// Snake-case label, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContextualLookup => "contextual_lookup",
            Self::DefinitionLookup => "definition_lookup",
            Self::Autowire => "autowire",
            Self::Evaluate => "evaluate",
            Self::Instantiate => "instantiate",
            Self::Success => "success",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
