use crate::context::ResolveContext;
use crate::hooks::Step;
use crate::request::ResolveRequest;
use crate::resolver::{Resolution, Resolver, StepResult};

/// Terminal sink: turns the fully-resolved request into the pipeline's
/// result.
pub struct ResultPlugin;

impl Step for ResultPlugin {
    fn name(&self) -> &'static str {
        "ResultPlugin"
    }

    fn run(
        &self,
        _resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        ctx.record(format!("reporting result {}", request.path.display()));
        Ok(Some(Resolution::Resource(request.clone())))
    }
}
