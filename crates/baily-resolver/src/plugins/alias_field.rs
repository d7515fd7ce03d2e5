use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::hooks::{HookId, Step};
use crate::request::ResolveRequest;
use crate::resolver::{Resolution, Resolver, StepResult};
use serde_json::Value;

/// Consults an alias table inside the attached description file (the
/// `browser`-field convention).
///
/// The lookup key is the remaining request, or the candidate path relative
/// to the description file root once the request has been merged away.
/// Mapped values are resolved from the description file root; `false`
/// switches the request off.
pub struct AliasFieldPlugin {
    field: String,
    target: HookId,
}

impl AliasFieldPlugin {
    #[must_use]
    pub fn new(field: String, target: HookId) -> Self {
        Self { field, target }
    }

    fn lookup<'a>(&self, table: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
        if let Some(value) = table.get(key) {
            return Some(value);
        }
        // Tolerate `./`-prefix mismatches between key and table.
        if let Some(stripped) = key.strip_prefix("./") {
            return table.get(stripped);
        }
        table.get(&format!("./{key}"))
    }
}

impl Step for AliasFieldPlugin {
    fn name(&self) -> &'static str {
        "AliasFieldPlugin"
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
        let Some(table) = description.data.get(&self.field).and_then(Value::as_object) else {
            return Ok(None);
        };

        let inner = if request.request.is_empty() {
            match request.relative_path() {
                Some(relative) => relative,
                None => return Ok(None),
            }
        } else {
            request.request.clone()
        };

        match self.lookup(table, &inner) {
            Some(Value::Bool(false)) => {
                ctx.record(format!(
                    "'{inner}' ignored by {} field of {}",
                    self.field,
                    description.path.display()
                ));
                Ok(Some(Resolution::Ignored))
            }
            Some(Value::String(mapped)) if *mapped != inner => {
                let mut next = request.clone();
                next.path = description.root.clone();
                next.request = mapped.clone();
                let message = format!(
                    "aliased from {} field of {}: '{}' to '{}'",
                    self.field,
                    description.path.display(),
                    inner,
                    mapped
                );
                match resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)? {
                    Some(resolution) => Ok(Some(resolution)),
                    None => Err(ResolveError::not_resolved(inner, description.root.clone())),
                }
            }
            _ => Ok(None),
        }
    }
}
