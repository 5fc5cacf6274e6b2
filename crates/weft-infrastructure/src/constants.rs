//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Engine defaults are defined in `weft_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "weft.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "weft";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WEFT";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "WEFT_LOG";

/// File stem used by the rolling appender when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "weft";
