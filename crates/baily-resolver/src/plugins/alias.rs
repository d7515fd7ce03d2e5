use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::hooks::{HookId, Step};
use crate::options::{AliasEntry, AliasValue};
use crate::request::ResolveRequest;
use crate::resolver::{for_each_bail, Resolution, Resolver, StepResult};
use std::borrow::Cow;

/// Applies one configured alias rule.
///
/// Matches the remaining request, or the candidate path once the request has
/// been merged away. A matched rule commits: if none of its replacement
/// targets resolve, the branch fails instead of falling back to the
/// un-aliased meaning.
pub struct AliasPlugin {
    entry: AliasEntry,
    target: HookId,
}

impl AliasPlugin {
    #[must_use]
    pub fn new(entry: AliasEntry, target: HookId) -> Self {
        Self { entry, target }
    }
}

impl Step for AliasPlugin {
    fn name(&self) -> &'static str {
        "AliasPlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let inner: Cow<'_, str> = if request.request.is_empty() {
            request.path.to_string_lossy()
        } else {
            Cow::Borrowed(request.request.as_str())
        };

        let name = self.entry.name.as_str();
        let matched = if self.entry.only_module {
            inner == name
        } else {
            inner == name || inner.starts_with(&format!("{name}/"))
        };
        if !matched {
            return Ok(None);
        }

        match &self.entry.alias {
            AliasValue::Ignore => {
                ctx.record(format!("'{inner}' ignored by alias configuration"));
                Ok(Some(Resolution::Ignored))
            }
            AliasValue::Targets(targets) => {
                let remainder = &inner[name.len()..];
                let mut rewritten = false;
                let result = for_each_bail(targets.iter(), ctx, |target, ctx| {
                    let replacement = format!("{target}{remainder}");
                    // A rewrite to itself would fork forever.
                    if replacement == *inner {
                        return Ok(None);
                    }
                    rewritten = true;
                    let mut next = request.clone();
                    next.request = replacement;
                    let message = format!("aliased with mapping '{name}' to '{target}'");
                    resolver.do_resolve(self.target, next, Some(message.as_str()), ctx)
                })?;

                match result {
                    Some(resolution) => Ok(Some(resolution)),
                    None if rewritten => Err(ResolveError::not_resolved(
                        inner.into_owned(),
                        request.path.clone(),
                    )),
                    None => Ok(None),
                }
            }
        }
    }
}
