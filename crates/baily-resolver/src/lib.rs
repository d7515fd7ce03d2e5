#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]

//! Node-style module resolution as a pluggable pipeline.
//!
//! A request like `./foo`, `lodash` or `lodash/fp` is driven through a graph
//! of named hooks; small steps tapped on those hooks rewrite the request and
//! fork alternatives until one produces a concrete file. The
//! [`ResolverFactory`] assembles the graph from a [`ResolveOptions`] record.

pub mod cache;
pub mod context;
pub mod description;
pub mod error;
pub mod factory;
pub mod fs;
pub mod hooks;
pub mod kind;
pub mod options;
pub mod path;
pub mod plugins;
pub mod pnp;
pub mod request;
pub mod resolver;

pub use cache::CacheKey;
pub use context::{LogEntry, ResolveContext, ResolveLog};
pub use description::{DescriptionFileInfo, DescriptionFileLoader};
pub use error::ResolveError;
pub use factory::ResolverFactory;
pub use fs::{CachedFileSystem, FileKind, FileSystem, NativeFileSystem};
pub use hooks::{HookId, Step};
pub use kind::PathKind;
pub use options::{AliasEntry, AliasValue, CachePredicate, MainFieldSpec, ResolveOptions};
pub use pnp::PackageManagerApi;
pub use request::{ContextInfo, ResolveRequest};
pub use resolver::{
    Resolution, ResolvePlugin, Resolver, ResolveResult, Resource, StepResult,
};
