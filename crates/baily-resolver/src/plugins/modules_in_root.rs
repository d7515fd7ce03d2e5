use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};
use std::path::PathBuf;

/// Retries module lookup from one fixed root directory.
pub struct ModulesInRootPlugin {
    root: PathBuf,
    target: HookId,
}

impl ModulesInRootPlugin {
    #[must_use]
    pub fn new(root: PathBuf, target: HookId) -> Self {
        Self { root, target }
    }
}

impl Step for ModulesInRootPlugin {
    fn name(&self) -> &'static str {
        "ModulesInRootPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let mut next = request.clone();
        next.path.clone_from(&self.root);
        let message = format!("looking for modules in {}", self.root.display());
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
