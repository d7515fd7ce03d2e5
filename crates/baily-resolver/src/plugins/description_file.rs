use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Attaches the nearest description file to the request.
///
/// In scan mode the full ancestor chain of `path` is searched. In attach
/// mode a description file carried by the request bounds the walk: only the
/// span between `path` and the known root is re-checked, so a package's own
/// description file shadows the one attached further up, and nothing above
/// the known root is visited again.
pub struct DescriptionFilePlugin {
    target: HookId,
    rescan: bool,
}

impl DescriptionFilePlugin {
    /// Walk the full ancestor chain.
    #[must_use]
    pub fn scan(target: HookId) -> Self {
        Self {
            target,
            rescan: true,
        }
    }

    /// Re-use an attached description file, re-checking only below its root.
    #[must_use]
    pub fn attach(target: HookId) -> Self {
        Self {
            target,
            rescan: false,
        }
    }
}

impl Step for DescriptionFilePlugin {
    fn name(&self) -> &'static str {
        "DescriptionFilePlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let attached = request
            .description_file
            .as_ref()
            .filter(|_| !self.rescan)
            .filter(|info| request.path.starts_with(&info.root));

        let stop = attached.map(|info| info.root.clone());
        let found = resolver.descriptions().load_nearest(
            resolver.file_system(),
            &request.path,
            stop.as_deref(),
            ctx,
        )?;

        match (found, attached) {
            (Some(info), _) => {
                let mut next = request.clone();
                next.description_file = Some(info.clone());
                let message = format!("using description file: {}", info.path.display());
                resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
            }
            // Nothing nearer; keep what the request already carries.
            (None, Some(_)) => resolver.do_resolve(self.target, request.clone(), None, ctx),
            (None, None) => {
                ctx.record("no description file found");
                resolver.do_resolve(self.target, request.clone(), None, ctx)
            }
        }
    }
}
