use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};
use std::path::PathBuf;

/// Tries the current candidate with a configured extension appended.
///
/// Yields when the candidate already carries that extension, so enabling an
/// extension a request spells out never changes the outcome.
pub struct AppendPlugin {
    extension: String,
    target: HookId,
}

impl AppendPlugin {
    #[must_use]
    pub fn new(extension: String, target: HookId) -> Self {
        Self { extension, target }
    }
}

impl Step for AppendPlugin {
    fn name(&self) -> &'static str {
        "AppendPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        if request.path.to_string_lossy().ends_with(&self.extension) {
            return Ok(None);
        }
        let mut appended = request.path.clone().into_os_string();
        appended.push(&self.extension);
        let mut next = request.clone();
        next.path = PathBuf::from(appended);
        let message = format!("using extension: {}", self.extension);
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
