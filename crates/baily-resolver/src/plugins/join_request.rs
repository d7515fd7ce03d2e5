use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Merges the remaining request into the path.
pub struct JoinRequestPlugin {
    target: HookId,
}

impl JoinRequestPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for JoinRequestPlugin {
    fn name(&self) -> &'static str {
        "JoinRequestPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let mut next = request.clone();
        next.path = path::join(&request.path, &request.request);
        next.request = String::new();
        resolver.do_resolve(self.target, next, None, ctx)
    }
}
