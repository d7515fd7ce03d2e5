use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Guards the non-directory branch: yields when the request carries
/// directory semantics, otherwise merges the remaining request into the path
/// and forks it as a file candidate.
pub struct FileKindPlugin {
    target: HookId,
    message: Option<&'static str>,
}

impl FileKindPlugin {
    #[must_use]
    pub fn new(target: HookId, message: Option<&'static str>) -> Self {
        Self { target, message }
    }
}

impl Step for FileKindPlugin {
    fn name(&self) -> &'static str {
        "FileKindPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        if request.directory {
            return Ok(None);
        }
        let mut next = request.clone();
        next.path = path::join(&request.path, &request.request);
        next.request = String::new();
        resolver.do_resolve(self.target, next, self.message, ctx)
    }
}
