use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Tries a configured main-file stem (e.g. `index`) inside the current
/// directory.
pub struct UseFilePlugin {
    filename: String,
    target: HookId,
}

impl UseFilePlugin {
    #[must_use]
    pub fn new(filename: String, target: HookId) -> Self {
        Self { filename, target }
    }
}

impl Step for UseFilePlugin {
    fn name(&self) -> &'static str {
        "UseFilePlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let mut next = request.clone();
        next.path = path::join(&request.path, &self.filename);
        next.request = String::new();
        let message = format!("using path: {}", next.path.display());
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
