use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::fs::FileKind;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{for_each_bail, Resolver, StepResult};
use std::io;
use std::path::PathBuf;

/// Retries module lookup in every ancestor directory that contains one of
/// the configured module directories (`node_modules`-style).
///
/// Candidates are probed innermost first, so a match near the requesting
/// path shadows one further up. Within one ancestor the directory names are
/// probed in the priority order the factory established.
pub struct ModulesInHierarchicDirectoriesPlugin {
    directories: Vec<String>,
    target: HookId,
}

impl ModulesInHierarchicDirectoriesPlugin {
    #[must_use]
    pub fn new(directories: Vec<String>, target: HookId) -> Self {
        Self { directories, target }
    }
}

impl Step for ModulesInHierarchicDirectoriesPlugin {
    fn name(&self) -> &'static str {
        "ModulesInHierarchicDirectoriesPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let mut candidates: Vec<PathBuf> = Vec::new();
        let mut current = Some(request.path.as_path());
        while let Some(dir) = current {
            for name in &self.directories {
                candidates.push(dir.join(name));
            }
            current = dir.parent();
        }

        for_each_bail(candidates, ctx, |candidate, ctx| {
            match resolver.file_system().stat(&candidate) {
                Ok(FileKind::Directory) => {
                    ctx.add_file_dependency(&candidate);
                    let mut next = request.clone();
                    next.path.clone_from(&candidate);
                    let message = format!("looking for modules in {}", candidate.display());
                    resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
                }
                Ok(_) => {
                    ctx.add_file_dependency(&candidate);
                    Ok(None)
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    ctx.add_missing_dependency(&candidate);
                    Ok(None)
                }
                Err(err) => Err(ResolveError::io(candidate.clone(), err)),
            }
        })
    }
}
