use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Unconditionally forks the unchanged request to another hook, annotated
/// with a human-readable message.
pub struct TryNextPlugin {
    target: HookId,
    message: &'static str,
}

impl TryNextPlugin {
    #[must_use]
    pub fn new(target: HookId, message: &'static str) -> Self {
        Self { target, message }
    }
}

impl Step for TryNextPlugin {
    fn name(&self) -> &'static str {
        "TryNextPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        resolver.do_resolve(self.target, request.clone(), Some(self.message), ctx)
    }
}
