//! Resolution engine configuration types

use serde::{Deserialize, Serialize};
use weft_domain::constants::DEFAULT_MAX_RESOLUTION_DEPTH;

/// Resolution engine limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Deepest allowed dependency chain before a request is aborted
    pub max_depth: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}
