//! Dependency graph / cycle detection
//!
//! The graph is never materialized. The in-flight resolution stack lives in
//! each [`KernelContext`]; before every recursive step the detector checks
//! the requested identifier against it.
//!
//! ```text
//! get(A) ─▶ A needs B ─▶ enter(ctx[A], B) ok      stack: A, B
//!           B needs A ─▶ enter(ctx[A,B], A)       A already in flight
//!                        └─▶ CircularDependency [A, B, A]
//! ```

use weft_domain::constants::DEFAULT_MAX_RESOLUTION_DEPTH;
use weft_domain::entities::KernelContext;
use weft_domain::error::{Error, Result};

/// Cycle and depth checks for recursive resolution
#[derive(Debug, Clone, Copy)]
pub struct CycleDetector {
    max_depth: usize,
}

impl CycleDetector {
    /// Detector with the given depth guard
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Configured depth guard
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Derive the context for resolving `dependency` on behalf of `parent`
    ///
    /// Fails with the full cycle path when `dependency` is already in flight,
    /// or with `DepthLimitExceeded` when the guard would be crossed.
    pub fn enter(&self, parent: &KernelContext, dependency: &str) -> Result<KernelContext> {
        let stack = parent.stack();
        if let Some(position) = stack.iter().position(|id| id == dependency) {
            let mut path = stack[position..].to_vec();
            path.push(dependency.to_string());
            return Err(Error::circular_dependency(path));
        }

        let child = parent.child(dependency);
        self.check_depth(&child)?;
        Ok(child)
    }

    /// Validate a context supplied from outside the pipeline
    ///
    /// Used when a caller continues an existing parent chain: the target
    /// must not already be one of its own ancestors.
    pub fn check(&self, context: &KernelContext) -> Result<()> {
        let id = context.service_id();
        if let Some(position) = context.chain().iter().position(|ancestor| ancestor == id) {
            let mut path = context.chain()[position..].to_vec();
            path.push(id.to_string());
            return Err(Error::circular_dependency(path));
        }
        self.check_depth(context)
    }

    fn check_depth(&self, context: &KernelContext) -> Result<()> {
        if context.depth() > self.max_depth {
            return Err(Error::depth_limit(
                context.service_id(),
                context.depth(),
                self.max_depth,
            ));
        }
        Ok(())
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}
