//! Resolver configuration.

use crate::pnp::PackageManagerApi;
use crate::request::ResolveRequest;
use crate::resolver::ResolvePlugin;
use std::fmt;
use std::sync::Arc;

/// Per-request filter deciding whether a resolution may enter the unsafe
/// cache.
pub type CachePredicate = Arc<dyn Fn(&ResolveRequest) -> bool + Send + Sync>;

/// What an alias maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasValue {
    /// Switch the request off entirely.
    Ignore,
    /// Ordered replacement candidates; the first that resolves wins.
    Targets(Vec<String>),
}

/// A single alias rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: String,
    pub alias: AliasValue,
    /// Match only the exact name, never `name/...`. Configured by a trailing
    /// `$` on the name.
    pub only_module: bool,
}

impl AliasEntry {
    /// Alias to a single target. A trailing `$` on `name` restricts the rule
    /// to exact matches.
    #[must_use]
    pub fn new(name: &str, target: impl Into<String>) -> Self {
        let (name, only_module) = strip_exact_marker(name);
        Self {
            name,
            alias: AliasValue::Targets(vec![target.into()]),
            only_module,
        }
    }

    /// Alias to an ordered list of targets.
    #[must_use]
    pub fn targets(name: &str, targets: Vec<String>) -> Self {
        let (name, only_module) = strip_exact_marker(name);
        Self {
            name,
            alias: AliasValue::Targets(targets),
            only_module,
        }
    }

    /// Switch requests matching `name` off.
    #[must_use]
    pub fn ignore(name: &str) -> Self {
        let (name, only_module) = strip_exact_marker(name);
        Self {
            name,
            alias: AliasValue::Ignore,
            only_module,
        }
    }
}

fn strip_exact_marker(name: &str) -> (String, bool) {
    match name.strip_suffix('$') {
        Some(stripped) => (stripped.to_string(), true),
        None => (name.to_string(), false),
    }
}

/// A main-field lookup inside a description file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainFieldSpec {
    /// Field name, or a path of names traversing nested objects.
    pub path: Vec<String>,
    /// Prepend `./` to values that are not already relative, so a plain
    /// `"dist/main.js"` stays inside the package.
    pub force_relative: bool,
}

impl MainFieldSpec {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            path: vec![name.to_string()],
            force_relative: true,
        }
    }

    /// A nested field path, e.g. `["dist", "main"]`.
    #[must_use]
    pub fn nested(path: Vec<String>) -> Self {
        Self {
            path,
            force_relative: true,
        }
    }

    #[must_use]
    pub fn with_force_relative(mut self, force_relative: bool) -> Self {
        self.force_relative = force_relative;
        self
    }

    pub(crate) fn display_name(&self) -> String {
        self.path.join(".")
    }
}

/// Options consumed by [`crate::ResolverFactory`].
///
/// Defaults mirror community node-style resolution.
pub struct ResolveOptions {
    /// Alias rules applied to raw and fully-joined requests, in order.
    pub alias: Vec<AliasEntry>,
    /// Description-file fields whose object values act as alias tables
    /// (`browser`-style).
    pub alias_fields: Vec<String>,
    /// Unsafe-cache admission filter; `None` admits everything.
    pub cache_predicate: Option<CachePredicate>,
    /// Whether the caller's issuer participates in the unsafe-cache key.
    pub cache_with_context: bool,
    /// Candidate description-file names, priority order.
    pub description_files: Vec<String>,
    /// Require requests to omit their extension; the extension-less probe is
    /// skipped and only configured extensions are appended.
    pub enforce_extension: bool,
    /// Extensions appended to extension-less candidates, in order.
    pub extensions: Vec<String>,
    /// Memoize successful resolutions for the lifetime of the resolver.
    pub unsafe_cache: bool,
    /// Canonicalize resolved paths through symlinks.
    pub symlinks: bool,
    /// Module lookup roots: bare names walk the directory hierarchy,
    /// absolute paths are single roots. Consecutive bare names form one
    /// priority group in which the later entry wins.
    pub modules: Vec<String>,
    /// Description-file fields naming a directory's entry file, in order.
    pub main_fields: Vec<MainFieldSpec>,
    /// Filename stems tried when a request resolves to a directory.
    pub main_files: Vec<String>,
    /// Extra taps installed after the built-in pipeline.
    pub plugins: Vec<Box<dyn ResolvePlugin>>,
    /// External package-manager lookup consulted before module roots.
    pub package_manager: Option<Arc<dyn PackageManagerApi>>,
    /// Terminate on the directory itself instead of an entry file inside it.
    pub resolve_to_context: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            alias: Vec::new(),
            alias_fields: Vec::new(),
            cache_predicate: None,
            cache_with_context: true,
            description_files: vec!["package.json".to_string()],
            enforce_extension: false,
            extensions: vec![".js".to_string(), ".json".to_string(), ".node".to_string()],
            unsafe_cache: false,
            symlinks: true,
            modules: vec!["node_modules".to_string()],
            main_fields: vec![MainFieldSpec::new("main")],
            main_files: vec!["index".to_string()],
            plugins: Vec::new(),
            package_manager: None,
            resolve_to_context: false,
        }
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("alias", &self.alias)
            .field("alias_fields", &self.alias_fields)
            .field("cache_with_context", &self.cache_with_context)
            .field("description_files", &self.description_files)
            .field("enforce_extension", &self.enforce_extension)
            .field("extensions", &self.extensions)
            .field("unsafe_cache", &self.unsafe_cache)
            .field("symlinks", &self.symlinks)
            .field("modules", &self.modules)
            .field("main_fields", &self.main_fields)
            .field("main_files", &self.main_files)
            .field("plugins", &self.plugins.len())
            .field("package_manager", &self.package_manager.is_some())
            .field("resolve_to_context", &self.resolve_to_context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_exact_marker() {
        let entry = AliasEntry::new("only$", "./only-impl");
        assert_eq!(entry.name, "only");
        assert!(entry.only_module);

        let entry = AliasEntry::new("web", "./web-impl");
        assert_eq!(entry.name, "web");
        assert!(!entry.only_module);
    }

    #[test]
    fn test_defaults_are_node_compatible() {
        let options = ResolveOptions::default();
        assert_eq!(options.extensions, vec![".js", ".json", ".node"]);
        assert_eq!(options.modules, vec!["node_modules"]);
        assert_eq!(options.main_files, vec!["index"]);
        assert_eq!(options.description_files, vec!["package.json"]);
        assert!(options.symlinks);
        assert!(!options.unsafe_cache);
        assert!(!options.enforce_extension);
    }
}
