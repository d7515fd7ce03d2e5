use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::{self, ResolveRequest};
use crate::resolver::{Resolver, StepResult};

/// Splits the raw identifier into request, query and fragment, derives the
/// directory flag from a trailing slash and classifies bare-module requests.
pub struct ParsePlugin {
    target: HookId,
}

impl ParsePlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for ParsePlugin {
    fn name(&self) -> &'static str {
        "ParsePlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let parsed = request::parse_identifier(&request.request);
        let mut next = request.clone();
        next.module = request::is_module_request(&parsed.request);
        next.directory = parsed.directory;
        next.request = parsed.request;
        next.query = parsed.query;
        next.fragment = parsed.fragment;
        resolver.do_resolve(self.target, next, None, ctx)
    }
}
