//! Domain constants

/// Default maximum depth of a single resolution chain
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 128;

/// Default number of completed traces kept for metrics export
pub const DEFAULT_MAX_RETAINED_TRACES: usize = 256;

/// Separator used when rendering a resolution chain
pub const CHAIN_SEPARATOR: &str = " -> ";
