use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Routes bare-module requests into module lookup.
///
/// Once taken, the branch commits: a bare identifier that no module root can
/// satisfy fails rather than being reinterpreted as a relative path.
pub struct ModuleKindPlugin {
    target: HookId,
}

impl ModuleKindPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for ModuleKindPlugin {
    fn name(&self) -> &'static str {
        "ModuleKindPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        if !request.module {
            return Ok(None);
        }
        let mut next = request.clone();
        next.module = false;
        match resolver.do_resolve(self.target, next, Some("resolve as module"), ctx)? {
            Some(resolution) => Ok(Some(resolution)),
            None => Err(ResolveError::not_resolved(
                request.request.clone(),
                request.path.clone(),
            )),
        }
    }
}
