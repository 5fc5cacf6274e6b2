//! Container view handed to factories and extenders

use crate::kernel::pipeline::ResolutionPipeline;
use weft_domain::entities::{Arguments, KernelContext};
use weft_domain::error::Result;
use weft_domain::ports::{Instance, ServiceResolver};

/// Resolves through the pipeline that invoked the factory
///
/// Every `get` is a dependency of the service being built, so it joins the
/// same parent chain and is cycle-checked against it.
pub(crate) struct PipelineResolver<'p, 'k> {
    pipeline: &'p ResolutionPipeline<'k>,
    context: &'p KernelContext,
}

impl<'p, 'k> PipelineResolver<'p, 'k> {
    pub(crate) fn new(pipeline: &'p ResolutionPipeline<'k>, context: &'p KernelContext) -> Self {
        Self { pipeline, context }
    }
}

impl ServiceResolver for PipelineResolver<'_, '_> {
    fn get(&self, id: &str) -> Result<Instance> {
        self.pipeline.resolve_dependency(self.context, id)
    }

    fn has(&self, id: &str) -> bool {
        self.pipeline.definitions().has(id)
    }

    fn parameters(&self) -> &Arguments {
        self.context.overrides()
    }

    fn service_id(&self) -> &str {
        self.context.service_id()
    }

    fn chain(&self) -> &[String] {
        self.context.chain()
    }
}
