use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::options::MainFieldSpec;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};
use serde_json::Value;

/// Reads a main field from the description file governing the current
/// directory and re-enters resolution with its value.
///
/// Only fires when the current path is the description file root itself, and
/// at most once per `(field, description file)` pair on any one branch; the
/// context marker breaks the cycle when a main field points back at its own
/// directory.
pub struct MainFieldPlugin {
    field: MainFieldSpec,
    target: HookId,
}

impl MainFieldPlugin {
    #[must_use]
    pub fn new(field: MainFieldSpec, target: HookId) -> Self {
        Self { field, target }
    }
}

impl Step for MainFieldPlugin {
    fn name(&self) -> &'static str {
        "MainFieldPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let Some(description) = &request.description_file else {
            return Ok(None);
        };
        if request.path != description.root {
            return Ok(None);
        }

        let marker = format!(
            "main-field:{}:{}",
            self.field.display_name(),
            description.path.display()
        );
        if request.markers.contains(&marker) {
            return Ok(None);
        }

        let mut value: &Value = &description.data;
        for name in &self.field.path {
            match value.get(name) {
                Some(nested) => value = nested,
                None => return Ok(None),
            }
        }
        let Some(main) = value.as_str() else {
            return Ok(None);
        };
        if main.is_empty() || main == "." || main == "./" {
            return Ok(None);
        }

        let rewritten = if self.field.force_relative
            && !main.starts_with("./")
            && !main.starts_with("../")
        {
            format!("./{main}")
        } else {
            main.to_string()
        };

        let mut next = request.clone();
        next.directory = rewritten.ends_with('/');
        next.module = false;
        next.request = rewritten;
        next.markers.insert(marker);
        let message = format!(
            "using {} field '{}' from {}",
            self.field.display_name(),
            main,
            description.path.display()
        );
        resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
    }
}
