//! Named hooks and their taps.
//!
//! A hook is a pipeline stage owning an ordered list of steps. Dispatch is
//! series-bail: taps run in registration order and the first one to produce
//! a result or an error ends the hook.

use crate::context::ResolveContext;
use crate::request::ResolveRequest;
use crate::resolver::{Resolver, StepResult};

/// Interned handle for a named hook. Valid only for the resolver that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub(crate) usize);

/// A handler registered on a hook.
///
/// From `run` a step either yields (`Ok(None)`), produces a terminal
/// resolution (`Ok(Some(_))`), fails (`Err(_)`), or forks into another hook
/// through [`Resolver::do_resolve`] and forwards that outcome.
pub trait Step: Send + Sync {
    /// Step name used in trace output.
    fn name(&self) -> &'static str;

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult;
}

pub(crate) struct Hook {
    pub(crate) name: String,
    pub(crate) taps: Vec<Box<dyn Step>>,
}

impl Hook {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            taps: Vec::new(),
        }
    }
}
