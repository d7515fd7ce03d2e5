use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::fs::FileKind;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};
use std::io;

/// Stat-guarded fan-through: continues only when the current path is an
/// existing regular file.
pub struct FileExistsPlugin {
    target: HookId,
}

impl FileExistsPlugin {
    #[must_use]
    pub fn new(target: HookId) -> Self {
        Self { target }
    }
}

impl Step for FileExistsPlugin {
    fn name(&self) -> &'static str {
        "FileExistsPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let path = &request.path;
        match resolver.file_system().stat(path) {
            Ok(FileKind::File) => {
                ctx.add_file_dependency(path);
                let message = format!("existing file: {}", path.display());
                resolver.do_resolve(self.target, request.clone(), Some(message.as_str()), ctx)
            }
            Ok(_) => {
                ctx.add_file_dependency(path);
                ctx.record(format!("{} is not a file", path.display()));
                Ok(None)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                ctx.add_missing_dependency(path);
                ctx.record(format!("{} doesn't exist", path.display()));
                Ok(None)
            }
            Err(err) => Err(ResolveError::io(path.clone(), err)),
        }
    }
}
