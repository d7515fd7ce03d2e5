use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::request::{split_package, ResolveRequest};
use crate::resolver::{Resolver, StepResult};

/// Merges only the leading package name into the path, leaving the subpath
/// in the request so directory resolution can continue with the remainder.
/// Scoped names (`@scope/pkg`) count as one segment.
pub struct JoinRequestPartPlugin {
    target: HookId,
}

impl JoinRequestPartPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for JoinRequestPartPlugin {
    fn name(&self) -> &'static str {
        "JoinRequestPartPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let (package, remainder) = split_package(&request.request);
        let mut next = request.clone();
        next.path = path::join(&request.path, package);
        next.request = remainder.to_string();
        let message = format!("resolve module part '{package}'");
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
