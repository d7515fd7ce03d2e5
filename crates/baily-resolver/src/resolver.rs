//! The resolution engine.
//!
//! Owns the hook registry, the filesystem port and the description-file
//! loader, and drives a single request through the hook graph. Forking
//! (`do_resolve`) is a nested call: the fork's outcome returns to the
//! forking step, which decides whether to forward, retry an alternative or
//! fail.

use crate::context::ResolveContext;
use crate::description::DescriptionFileLoader;
use crate::error::ResolveError;
use crate::fs::FileSystem;
use crate::hooks::{Hook, HookId, Step};
use crate::kind::PathKind;
use crate::request::{ContextInfo, ResolveRequest};
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Terminal outcome of a pipeline dispatch.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Resolved to a concrete filesystem entry, carried as the final request.
    Resource(ResolveRequest),
    /// Deliberately ignored by configuration.
    Ignored,
}

/// Shared step result: `Ok(None)` yields to the next tap, `Ok(Some(_))`
/// terminates the request, `Err(_)` fails this branch.
pub type StepResult = Result<Option<Resolution>, ResolveError>;

/// A successfully resolved resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Absolute path of the resolved file (or directory, when resolving to a
    /// context).
    pub path: PathBuf,
    /// Query part of the original request, without the leading `?`.
    pub query: String,
    /// Fragment part of the original request, without the leading `#`.
    pub fragment: String,
    /// The description file that governed the resolution, if any.
    pub description_file_path: Option<PathBuf>,
}

impl Resource {
    /// Render as `path?query#fragment`.
    #[must_use]
    pub fn full_path(&self) -> String {
        let mut out = self.path.display().to_string();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&self.fragment);
        }
        out
    }
}

/// Outcome of a top-level [`Resolver::resolve`] call.
#[derive(Debug, Clone)]
pub enum ResolveResult {
    Resource(Resource),
    /// The request was switched off by configuration (an alias mapping to
    /// `false`).
    Ignored,
}

impl ResolveResult {
    #[must_use]
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Ignored => None,
        }
    }
}

/// Anything able to install taps on a resolver.
///
/// Implemented for plain functions as well, so a closure
/// `|resolver: &mut Resolver| ...` can be handed to the factory's `plugins`
/// option directly.
pub trait ResolvePlugin: Send + Sync {
    fn apply(&self, resolver: &mut Resolver);
}

impl<F> ResolvePlugin for F
where
    F: Fn(&mut Resolver) + Send + Sync,
{
    fn apply(&self, resolver: &mut Resolver) {
        self(resolver);
    }
}

pub struct Resolver {
    fs: Arc<dyn FileSystem>,
    descriptions: DescriptionFileLoader,
    hooks: Vec<Hook>,
    names: FxHashMap<String, HookId>,
    entry: HookId,
}

impl Resolver {
    /// A bare resolver with no taps. Use [`crate::ResolverFactory`] for the
    /// full pipeline.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        let mut resolver = Self {
            fs,
            descriptions: DescriptionFileLoader::new(vec!["package.json".to_string()]),
            hooks: Vec::new(),
            names: FxHashMap::default(),
            entry: HookId(0),
        };
        resolver.entry = resolver.ensure_hook("resolve");
        resolver
    }

    /// Get or create a hook by name. Hooks are never destroyed.
    pub fn ensure_hook(&mut self, name: &str) -> HookId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }
        let id = HookId(self.hooks.len());
        self.hooks.push(Hook::new(name));
        self.names.insert(name.to_string(), id);
        id
    }

    /// Look up an existing hook.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<HookId> {
        self.names.get(name).copied()
    }

    /// Append a step to a hook's tap list.
    pub fn tap(&mut self, hook: HookId, step: Box<dyn Step>) {
        self.hooks[hook.0].taps.push(step);
    }

    #[must_use]
    pub fn file_system(&self) -> &dyn FileSystem {
        &*self.fs
    }

    #[must_use]
    pub fn descriptions(&self) -> &DescriptionFileLoader {
        &self.descriptions
    }

    pub(crate) fn set_description_filenames(&mut self, filenames: Vec<String>) {
        self.descriptions = DescriptionFileLoader::new(filenames);
    }

    /// Resolve `request` from the context directory `path`.
    pub fn resolve(
        &self,
        info: &ContextInfo,
        path: &Path,
        request: &str,
        ctx: &mut ResolveContext,
    ) -> Result<ResolveResult, ResolveError> {
        if request.is_empty() {
            return Err(ResolveError::BadRequest {
                request: String::new(),
                reason: "request must not be empty".to_string(),
            });
        }
        if !path.is_absolute() && !PathKind::of(&path.to_string_lossy()).is_absolute() {
            return Err(ResolveError::BadRequest {
                request: request.to_string(),
                reason: format!("context path '{}' must be absolute", path.display()),
            });
        }

        let initial =
            ResolveRequest::new(path.to_path_buf(), request.to_string(), info.issuer.clone());
        let message = format!("resolve '{}' in '{}'", request, path.display());
        match self.do_resolve(self.entry, initial, Some(message.as_str()), ctx)? {
            Some(Resolution::Resource(done)) => Ok(ResolveResult::Resource(Resource {
                query: done.query.clone(),
                fragment: done.fragment.clone(),
                description_file_path: done
                    .description_file
                    .as_ref()
                    .map(|description| description.path.clone()),
                path: done.path,
            })),
            Some(Resolution::Ignored) => Ok(ResolveResult::Ignored),
            None => Err(ResolveError::NotResolved {
                request: request.to_string(),
                path: path.to_path_buf(),
                trace: ctx.log_lines(),
            }),
        }
    }

    /// Fork: dispatch `request` through `hook` and hand the outcome back to
    /// the caller.
    ///
    /// The `(hook, request)` pair is fingerprinted against the live fork
    /// stack; re-entering a pair that has not finished yet fails with a
    /// recursion error.
    pub fn do_resolve(
        &self,
        hook: HookId,
        request: ResolveRequest,
        message: Option<&str>,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        let hook_name = &self.hooks[hook.0].name;
        let fingerprint = format!(
            "{}: ({}) {}",
            hook_name,
            request.path.display(),
            request.display()
        );
        if ctx.stack.contains(&fingerprint) {
            return Err(ResolveError::Recursion {
                hook: hook_name.clone(),
                request: request.display(),
            });
        }

        if let Some(message) = message {
            ctx.record(message);
        }

        ctx.stack.insert(fingerprint.clone());
        ctx.depth += 1;
        let result = self.dispatch(hook, &request, ctx);
        ctx.depth -= 1;
        ctx.stack.remove(&fingerprint);
        result
    }

    fn dispatch(&self, hook: HookId, request: &ResolveRequest, ctx: &mut ResolveContext) -> StepResult {
        for tap in &self.hooks[hook.0].taps {
            tracing::trace!(
                hook = %self.hooks[hook.0].name,
                step = tap.name(),
                path = %request.path.display(),
                request = %request.request,
                "running step"
            );
            if let Some(resolution) = tap.run(self, request, ctx)? {
                return Ok(Some(resolution));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field(
                "hooks",
                &self
                    .hooks
                    .iter()
                    .map(|hook| (hook.name.as_str(), hook.taps.len()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Try alternatives in order: the first success wins, errors are remembered
/// and reported only when no alternative succeeds.
pub(crate) fn for_each_bail<T, I, F>(items: I, ctx: &mut ResolveContext, mut run: F) -> StepResult
where
    I: IntoIterator<Item = T>,
    F: FnMut(T, &mut ResolveContext) -> StepResult,
{
    let mut saved: Option<ResolveError> = None;
    for item in items {
        match run(item, ctx) {
            Ok(Some(resolution)) => return Ok(Some(resolution)),
            Ok(None) => {}
            Err(err) => saved = Some(prefer_error(saved, err)),
        }
    }
    match saved {
        Some(err) => Err(err),
        None => Ok(None),
    }
}

/// Keep the more informative of two branch errors: anything beats a
/// recursion abort, otherwise the earlier error stands.
fn prefer_error(saved: Option<ResolveError>, next: ResolveError) -> ResolveError {
    match saved {
        None => next,
        Some(ResolveError::Recursion { .. }) if !matches!(next, ResolveError::Recursion { .. }) => {
            next
        }
        Some(prev) => prev,
    }
}
