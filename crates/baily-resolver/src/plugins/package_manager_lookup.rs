use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::pnp::PackageManagerApi;
use crate::request::{split_package, ResolveRequest};
use crate::resolver::{Resolver, StepResult};
use std::sync::Arc;

/// Delegates module lookup to an external package-manager API.
///
/// On a hit the branch commits: the package manager's placement is
/// authoritative, so a missing file inside the mapped package fails instead
/// of falling back to module-root probing.
pub struct PackageManagerLookupPlugin {
    api: Arc<dyn PackageManagerApi>,
    target: HookId,
}

impl PackageManagerLookupPlugin {
    #[must_use]
    pub fn new(api: Arc<dyn PackageManagerApi>, target: HookId) -> Self {
        Self { api, target }
    }
}

impl Step for PackageManagerLookupPlugin {
    fn name(&self) -> &'static str {
        "PackageManagerLookupPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        if request.request.is_empty() {
            return Ok(None);
        }
        let (package, remainder) = split_package(&request.request);
        let Some(root) = self.api.resolve_to_unqualified(package, &request.path)? else {
            return Ok(None);
        };

        let mut next = request.clone();
        next.path = if remainder.is_empty() {
            root.clone()
        } else {
            path::join(&root, remainder)
        };
        next.request = String::new();
        let message = format!(
            "package manager mapped '{}' to {}",
            package,
            root.display()
        );
        match resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)? {
            Some(resolution) => Ok(Some(resolution)),
            None => Err(ResolveError::not_resolved(request.request.clone(), root)),
        }
    }
}
