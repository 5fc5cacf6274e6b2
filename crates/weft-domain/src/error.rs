//! Error handling types

use crate::constants::CHAIN_SEPARATOR;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the weft resolution engine
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier has no definition and could not be autowired
    #[error("Service not found: {id}")]
    ServiceNotFound {
        /// The identifier that was requested
        id: String,
        /// Ancestors in flight when the lookup failed
        chain: Vec<String>,
    },

    /// Requested identifier already appears in the active parent chain
    #[error("Circular dependency detected: {}", .path.join(CHAIN_SEPARATOR))]
    CircularDependency {
        /// Full cycle, starting and ending with the repeated identifier
        path: Vec<String>,
    },

    /// Building a class candidate failed
    #[error("Unable to auto-resolve class '{class}': {message}")]
    AutoResolve {
        /// Class that could not be built
        class: String,
        /// Description of the failure
        message: String,
        /// Optional source error (e.g. the constructor's own failure)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A parameter has no type, no default and no binding
    #[error("Unresolvable dependency: parameter '{parameter}' of '{consumer}'")]
    UnresolvableDependency {
        /// Class or callable declaring the parameter
        consumer: String,
        /// Parameter name
        parameter: String,
        /// Ancestors in flight when the parameter was reached
        chain: Vec<String>,
    },

    /// Pipeline failure surfaced at the kernel boundary
    #[error("Failed to resolve '{id}': {source}")]
    Resolution {
        /// Identifier of the top-level request
        id: String,
        /// Resolution stack at the time of failure
        chain: Vec<String>,
        /// Originating failure
        #[source]
        source: Box<Error>,
    },

    /// The configured depth guard aborted a resolution
    #[error("Resolution depth limit exceeded for '{id}': depth {depth} > limit {limit}")]
    DepthLimitExceeded {
        /// Identifier being resolved when the guard tripped
        id: String,
        /// Depth reached
        depth: usize,
        /// Configured maximum
        limit: usize,
    },

    /// A scoped service was requested outside of any scope
    #[error("No active scope for scoped service '{id}'")]
    NoActiveScope {
        /// The scoped identifier
        id: String,
    },

    /// Scope stack misuse
    #[error("Scope error: {message}")]
    Scope {
        /// Description of the misuse
        message: String,
    },

    /// A resolved instance is not of the requested Rust type
    #[error("Service '{id}' is not of type {expected}")]
    TypeMismatch {
        /// The identifier that was resolved
        id: String,
        /// The requested Rust type name
        expected: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal engine error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Resolution error creation methods
impl Error {
    /// Create a service-not-found error
    pub fn service_not_found<S: Into<String>>(id: S, chain: &[String]) -> Self {
        Self::ServiceNotFound {
            id: id.into(),
            chain: chain.to_vec(),
        }
    }

    /// Create a circular dependency error from the full cycle path
    pub fn circular_dependency(path: Vec<String>) -> Self {
        Self::CircularDependency { path }
    }

    /// Create an auto-resolve error
    pub fn auto_resolve<C: Into<String>, M: Into<String>>(class: C, message: M) -> Self {
        Self::AutoResolve {
            class: class.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an auto-resolve error with source
    pub fn auto_resolve_with_source<C, M, E>(class: C, message: M, source: E) -> Self
    where
        C: Into<String>,
        M: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::AutoResolve {
            class: class.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unresolvable-dependency error
    pub fn unresolvable<C: Into<String>, P: Into<String>>(
        consumer: C,
        parameter: P,
        chain: &[String],
    ) -> Self {
        Self::UnresolvableDependency {
            consumer: consumer.into(),
            parameter: parameter.into(),
            chain: chain.to_vec(),
        }
    }

    /// Wrap a failure at the kernel boundary
    ///
    /// Already-wrapped errors are returned unchanged so nested kernel calls
    /// never stack wrappers.
    pub fn resolution<S: Into<String>>(id: S, chain: Vec<String>, source: Error) -> Self {
        match source {
            wrapped @ Self::Resolution { .. } => wrapped,
            other => Self::Resolution {
                id: id.into(),
                chain,
                source: Box::new(other),
            },
        }
    }

    /// Create a depth-limit error
    pub fn depth_limit<S: Into<String>>(id: S, depth: usize, limit: usize) -> Self {
        Self::DepthLimitExceeded {
            id: id.into(),
            depth,
            limit,
        }
    }

    /// Create a missing-scope error
    pub fn no_active_scope<S: Into<String>>(id: S) -> Self {
        Self::NoActiveScope { id: id.into() }
    }

    /// Create a scope usage error
    pub fn scope<S: Into<String>>(message: S) -> Self {
        Self::Scope {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(id: S, expected: &str) -> Self {
        Self::TypeMismatch {
            id: id.into(),
            expected: expected.to_string(),
        }
    }
}

// Ambient error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Diagnostics
impl Error {
    /// The originating failure, looking through the kernel boundary wrapper
    pub fn cause(&self) -> &Error {
        match self {
            Self::Resolution { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Whether the originating failure is a missing service
    pub fn is_not_found(&self) -> bool {
        matches!(self.cause(), Self::ServiceNotFound { .. })
    }

    /// Whether the originating failure is a missing service with the given id
    pub fn is_not_found_for(&self, id: &str) -> bool {
        matches!(self.cause(), Self::ServiceNotFound { id: missing, .. } if missing == id)
    }

    /// Cycle path when the originating failure is a circular dependency
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self.cause() {
            Self::CircularDependency { path } => Some(path),
            _ => None,
        }
    }

    /// Resolution stack recorded for this error, if any
    pub fn resolution_chain(&self) -> &[String] {
        match self {
            Self::Resolution { chain, .. }
            | Self::ServiceNotFound { chain, .. }
            | Self::UnresolvableDependency { chain, .. } => chain,
            Self::CircularDependency { path } => path,
            _ => &[],
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::internal(s)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::internal(s)
    }
}
