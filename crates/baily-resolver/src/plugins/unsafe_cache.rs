use crate::cache::CacheKey;
use crate::context::ResolveContext;
use crate::hooks::{HookId, Step};
use crate::options::CachePredicate;
use crate::request::ResolveRequest;
use crate::resolver::{Resolution, Resolver, StepResult};
use rustc_hash::FxHashMap;
use std::sync::RwLock;

/// Memoizes terminal resolutions at the very front of the pipeline.
///
/// The store belongs to this plugin instance, and the factory creates one
/// instance per resolver, so option sets never share cached answers. Entries
/// are only invalidated by rebuilding the resolver.
pub struct UnsafeCachePlugin {
    target: HookId,
    predicate: Option<CachePredicate>,
    with_context: bool,
    store: RwLock<FxHashMap<CacheKey, Resolution>>,
}

impl UnsafeCachePlugin {
    #[must_use]
    pub fn new(target: HookId, predicate: Option<CachePredicate>, with_context: bool) -> Self {
        Self {
            target,
            predicate,
            with_context,
            store: RwLock::new(FxHashMap::default()),
        }
    }
}

impl Step for UnsafeCachePlugin {
    fn name(&self) -> &'static str {
        "UnsafeCachePlugin"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let key = CacheKey::new(request, self.with_context);
        if let Some(hit) = self.store.read().unwrap().get(&key) {
            ctx.record(format!("cached resolution of '{}'", request.display()));
            return Ok(Some(hit.clone()));
        }

        let result = resolver.do_resolve(self.target, request.clone(), None, ctx)?;
        if let Some(resolution) = &result {
            let admitted = self
                .predicate
                .as_ref()
                .map_or(true, |accept| (**accept)(request));
            if admitted {
                self.store.write().unwrap().insert(key, resolution.clone());
            }
        }
        Ok(result)
    }
}
