use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Unconditionally forks the unchanged request to another hook.
pub struct NextPlugin {
    target: HookId,
}

impl NextPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for NextPlugin {
    fn name(&self) -> &'static str {
        "NextPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        resolver.do_resolve(self.target, request.clone(), None, ctx)
    }
}
