use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::path;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};
use std::path::PathBuf;

/// Bound on link-chain hops per path segment.
const MAX_LINK_HOPS: usize = 32;

/// Canonicalizes every symlink segment of the resolved path.
///
/// When the canonical form differs from the current path the request is
/// re-forked with the canonical path; otherwise the step yields.
pub struct SymlinkPlugin {
    target: HookId,
}

impl SymlinkPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for SymlinkPlugin {
    fn name(&self) -> &'static str {
        "SymlinkPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let fs = resolver.file_system();
        let mut resolved = PathBuf::new();
        let mut changed = false;

        for component in request.path.components() {
            resolved.push(component.as_os_str());
            let mut hops = 0;
            while hops < MAX_LINK_HOPS {
                match fs.read_link(&resolved) {
                    Ok(link) => {
                        changed = true;
                        resolved = if link.is_absolute() {
                            path::normalize(&link)
                        } else {
                            let parent = resolved
                                .parent()
                                .map(PathBuf::from)
                                .unwrap_or_default();
                            path::normalize(&parent.join(link))
                        };
                        hops += 1;
                    }
                    // Not a symlink (or gone); keep the segment as-is.
                    Err(_) => break,
                }
            }
        }

        if !changed || resolved == request.path {
            return Ok(None);
        }

        let mut next = request.clone();
        next.path = resolved;
        let message = format!("symlinked to {}", next.path.display());
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
