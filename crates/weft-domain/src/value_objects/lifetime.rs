//! Service lifetimes

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a resolved instance is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// A fresh instance on every resolution
    #[default]
    Transient,
    /// One instance for the container's life
    Singleton,
    /// One instance per active scope
    Scoped,
}

impl Lifetime {
    /// Whether instances of this lifetime are cached anywhere
    pub fn is_cached(self) -> bool {
        !matches!(self, Self::Transient)
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
