//! End-to-end resolution tests over real fixture trees.

use baily_resolver::{
    AliasEntry, CachedFileSystem, ContextInfo, HookId, NativeFileSystem, PackageManagerApi,
    ResolveContext, ResolveError, ResolveOptions, ResolvePlugin, ResolveRequest, ResolveResult,
    Resolver, ResolverFactory, Step, StepResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn mkdir(root: &Path, rel: &str) {
    fs::create_dir_all(root.join(rel)).unwrap();
}

/// Fresh tempdir with a canonicalized root, so resolved paths compare
/// exactly even when the temp location itself sits behind a symlink.
fn fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

/// The tree the end-to-end scenarios share.
fn extensions_tree() -> (TempDir, PathBuf) {
    let (dir, root) = fixture();
    write(&root, "package.json", r#"{"main": "./index.js"}"#);
    write(&root, "foo.ts", "");
    write(&root, "foo.js", "");
    write(&root, "index.ts", "");
    write(&root, "index.js", "");
    write(&root, "dir/index.ts", "");
    write(&root, "node_modules/module.js", "");
    write(&root, "node_modules/module/index.ts", "");
    (dir, root)
}

fn ts_options() -> ResolveOptions {
    ResolveOptions {
        extensions: vec![".ts".to_string(), ".js".to_string()],
        ..ResolveOptions::default()
    }
}

fn resolver(options: ResolveOptions) -> Resolver {
    ResolverFactory::create(options, Arc::new(NativeFileSystem))
}

fn resolve_path(resolver: &Resolver, context: &Path, request: &str) -> PathBuf {
    let mut ctx = ResolveContext::new();
    let result = resolver
        .resolve(&ContextInfo::default(), context, request, &mut ctx)
        .unwrap();
    result.resource().expect("expected a resource").path.clone()
}

#[test]
fn test_explicit_extension_wins_over_probing_order() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    assert_eq!(resolve_path(&resolver, &root, "./foo"), root.join("foo.ts"));
    assert_eq!(
        resolve_path(&resolver, &root, "./foo.js"),
        root.join("foo.js")
    );
}

#[test]
fn test_directory_resolves_to_index() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    assert_eq!(
        resolve_path(&resolver, &root, "./dir"),
        root.join("dir/index.ts")
    );
}

#[test]
fn test_dot_uses_main_field_over_index_probing() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    // index.ts exists and .ts probes first, but the main field names
    // ./index.js and runs before the index-file fallback.
    assert_eq!(resolve_path(&resolver, &root, "."), root.join("index.js"));
}

#[test]
fn test_single_file_module_beats_package_directory() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    assert_eq!(
        resolve_path(&resolver, &root, "module"),
        root.join("node_modules/module.js")
    );
}

#[test]
fn test_trailing_slash_forces_directory_semantics() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    assert_eq!(
        resolve_path(&resolver, &root, "module/"),
        root.join("node_modules/module/index.ts")
    );
}

#[test]
fn test_trailing_slash_on_a_file_fails() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::new();
    let err = resolver
        .resolve(&ContextInfo::default(), &root, "./foo.js/", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotResolved { .. }));
}

#[test]
fn test_parent_directory_request() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    assert_eq!(
        resolve_path(&resolver, &root.join("dir"), "../foo"),
        root.join("foo.ts")
    );
}

#[test]
fn test_query_and_fragment_are_carried_through() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::new();
    let result = resolver
        .resolve(&ContextInfo::default(), &root, "./foo?a=1#frag", &mut ctx)
        .unwrap();
    let resource = result.resource().unwrap();
    assert_eq!(resource.path, root.join("foo.ts"));
    assert_eq!(resource.query, "a=1");
    assert_eq!(resource.fragment, "frag");
    assert!(resource.full_path().ends_with("foo.ts?a=1#frag"));
}

#[test]
fn test_description_file_is_reported() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::new();
    let result = resolver
        .resolve(&ContextInfo::default(), &root, "./foo", &mut ctx)
        .unwrap();
    assert_eq!(
        result.resource().unwrap().description_file_path,
        Some(root.join("package.json"))
    );
}

#[test]
fn test_empty_request_is_rejected() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::new();
    let err = resolver
        .resolve(&ContextInfo::default(), &root, "", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ResolveError::BadRequest { .. }));
}

#[test]
fn test_relative_context_path_is_rejected() {
    let (_dir, _root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::new();
    let err = resolver
        .resolve(&ContextInfo::default(), Path::new("rel/ctx"), "./foo", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ResolveError::BadRequest { .. }));
}

#[test]
fn test_package_main_field_inside_node_modules() {
    let (_dir, root) = fixture();
    write(
        &root,
        "node_modules/withmain/package.json",
        r#"{"main": "./lib/entry.js"}"#,
    );
    write(&root, "node_modules/withmain/lib/entry.js", "");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "withmain"),
        root.join("node_modules/withmain/lib/entry.js")
    );
}

#[test]
fn test_main_field_without_relative_prefix() {
    let (_dir, root) = fixture();
    write(
        &root,
        "node_modules/plain/package.json",
        r#"{"main": "dist/main.js"}"#,
    );
    write(&root, "node_modules/plain/dist/main.js", "");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "plain"),
        root.join("node_modules/plain/dist/main.js")
    );
}

#[test]
fn test_broken_main_field_falls_back_to_index() {
    let (_dir, root) = fixture();
    write(
        &root,
        "node_modules/broken/package.json",
        r#"{"main": "./missing.js"}"#,
    );
    write(&root, "node_modules/broken/index.js", "");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "broken"),
        root.join("node_modules/broken/index.js")
    );
}

#[test]
fn test_package_subpath_with_extension_probing() {
    let (_dir, root) = fixture();
    write(&root, "node_modules/util-pkg/fp.js", "");
    write(&root, "node_modules/util-pkg/lib/deep.js", "");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "util-pkg/fp"),
        root.join("node_modules/util-pkg/fp.js")
    );
    assert_eq!(
        resolve_path(&resolver, &root, "util-pkg/lib/deep"),
        root.join("node_modules/util-pkg/lib/deep.js")
    );
}

#[test]
fn test_scoped_packages() {
    let (_dir, root) = fixture();
    write(&root, "node_modules/@scope/pkg/index.js", "");
    write(&root, "node_modules/@scope/pkg/lib/util.js", "");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "@scope/pkg"),
        root.join("node_modules/@scope/pkg/index.js")
    );
    assert_eq!(
        resolve_path(&resolver, &root, "@scope/pkg/lib/util"),
        root.join("node_modules/@scope/pkg/lib/util.js")
    );
}

#[test]
fn test_inner_module_root_shadows_outer() {
    let (_dir, root) = fixture();
    write(&root, "node_modules/dep/index.js", "outer");
    write(&root, "nested/node_modules/dep/index.js", "inner");
    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root.join("nested"), "dep"),
        root.join("nested/node_modules/dep/index.js")
    );
    // From the root itself only the outer copy is visible.
    assert_eq!(
        resolve_path(&resolver, &root, "dep"),
        root.join("node_modules/dep/index.js")
    );
}

#[test]
fn test_later_configured_module_directory_wins() {
    let (_dir, root) = fixture();
    write(&root, "node_modules/dep/index.js", "");
    write(&root, "web_modules/dep/index.js", "");
    let resolver = resolver(ResolveOptions {
        modules: vec!["node_modules".to_string(), "web_modules".to_string()],
        ..ResolveOptions::default()
    });
    assert_eq!(
        resolve_path(&resolver, &root, "dep"),
        root.join("web_modules/dep/index.js")
    );
}

#[test]
fn test_absolute_module_root() {
    let (_dir, root) = fixture();
    write(&root, "custom_modules/pkg/index.js", "");
    let custom = root.join("custom_modules");
    let resolver = resolver(ResolveOptions {
        modules: vec![custom.to_string_lossy().into_owned()],
        ..ResolveOptions::default()
    });
    assert_eq!(
        resolve_path(&resolver, &root, "pkg"),
        root.join("custom_modules/pkg/index.js")
    );
}

#[test]
fn test_missing_module_is_an_error() {
    let (_dir, root) = fixture();
    mkdir(&root, "node_modules");
    let resolver = resolver(ResolveOptions::default());
    let mut ctx = ResolveContext::new();
    let err = resolver
        .resolve(&ContextInfo::default(), &root, "nonexistent-pkg", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotResolved { .. }));
}

#[test]
fn test_alias_rewrites_module_to_relative() {
    let (_dir, root) = fixture();
    write(&root, "web-impl/file.ts", "");
    let resolver = resolver(ResolveOptions {
        alias: vec![AliasEntry::new("web", "./web-impl")],
        ..ts_options()
    });
    let aliased = resolve_path(&resolver, &root, "web/file");
    let direct = resolve_path(&resolver, &root, "./web-impl/file");
    assert_eq!(aliased, direct);
    assert_eq!(aliased, root.join("web-impl/file.ts"));
}

#[test]
fn test_alias_to_false_ignores_the_request() {
    let (_dir, root) = fixture();
    write(&root, "dummy.js", "");
    let resolver = resolver(ResolveOptions {
        alias: vec![AliasEntry::ignore("ignored")],
        ..ResolveOptions::default()
    });
    let mut ctx = ResolveContext::new();
    let result = resolver
        .resolve(&ContextInfo::default(), &root, "ignored", &mut ctx)
        .unwrap();
    assert!(matches!(result, ResolveResult::Ignored));
    assert!(result.resource().is_none());
}

#[test]
fn test_exact_alias_does_not_match_subpaths() {
    let (_dir, root) = fixture();
    write(&root, "only-impl.ts", "");
    mkdir(&root, "node_modules");
    let resolver = resolver(ResolveOptions {
        alias: vec![AliasEntry::new("only$", "./only-impl")],
        ..ts_options()
    });
    assert_eq!(
        resolve_path(&resolver, &root, "only"),
        root.join("only-impl.ts")
    );
    let mut ctx = ResolveContext::new();
    assert!(resolver
        .resolve(&ContextInfo::default(), &root, "only/file", &mut ctx)
        .is_err());
}

#[test]
fn test_circular_aliases_fail_instead_of_hanging() {
    let (_dir, root) = fixture();
    mkdir(&root, "node_modules");
    let resolver = resolver(ResolveOptions {
        alias: vec![AliasEntry::new("a", "b"), AliasEntry::new("b", "a")],
        ..ResolveOptions::default()
    });
    let mut ctx = ResolveContext::new();
    assert!(resolver
        .resolve(&ContextInfo::default(), &root, "a", &mut ctx)
        .is_err());
}

#[test]
fn test_alias_field_redirects_relative_files() {
    let (_dir, root) = fixture();
    write(
        &root,
        "package.json",
        r#"{"browser": {"./lib/server.js": "./lib/client.js", "net": "./lib/net-shim.js"}}"#,
    );
    write(&root, "lib/server.js", "");
    write(&root, "lib/client.js", "");
    write(&root, "lib/net-shim.js", "");
    let resolver = resolver(ResolveOptions {
        alias_fields: vec!["browser".to_string()],
        ..ResolveOptions::default()
    });
    assert_eq!(
        resolve_path(&resolver, &root, "./lib/server"),
        root.join("lib/client.js")
    );
    // An unmapped sibling keeps resolving to itself.
    assert_eq!(
        resolve_path(&resolver, &root, "./lib/client"),
        root.join("lib/client.js")
    );
}

#[test]
fn test_alias_field_shims_a_module_name() {
    let (_dir, root) = fixture();
    write(
        &root,
        "package.json",
        r#"{"browser": {"net": "./lib/net-shim.js"}}"#,
    );
    write(&root, "lib/net-shim.js", "");
    let resolver = resolver(ResolveOptions {
        alias_fields: vec!["browser".to_string()],
        ..ResolveOptions::default()
    });
    assert_eq!(
        resolve_path(&resolver, &root, "net"),
        root.join("lib/net-shim.js")
    );
}

#[test]
fn test_enforce_extension_requires_extensionless_requests() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ResolveOptions {
        enforce_extension: true,
        ..ts_options()
    });
    assert_eq!(resolve_path(&resolver, &root, "./foo"), root.join("foo.ts"));
    let mut ctx = ResolveContext::new();
    assert!(resolver
        .resolve(&ContextInfo::default(), &root, "./foo.js", &mut ctx)
        .is_err());
}

#[test]
fn test_resolve_to_context_returns_the_directory() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ResolveOptions {
        resolve_to_context: true,
        ..ts_options()
    });
    assert_eq!(resolve_path(&resolver, &root, "./dir"), root.join("dir"));

    // A file never satisfies a context request.
    let mut ctx = ResolveContext::new();
    assert!(resolver
        .resolve(&ContextInfo::default(), &root, "./foo.ts", &mut ctx)
        .is_err());
}

#[test]
fn test_unsafe_cache_answers_match_uncached_answers() {
    let (_dir, root) = extensions_tree();
    let cold = resolver(ts_options());
    let cached = resolver(ResolveOptions {
        unsafe_cache: true,
        ..ts_options()
    });

    for request in ["./foo", "./dir", ".", "module", "module/"] {
        let expected = resolve_path(&cold, &root, request);
        assert_eq!(resolve_path(&cached, &root, request), expected, "{request}");
        // Second pass is served from the memo and must agree.
        assert_eq!(resolve_path(&cached, &root, request), expected, "{request}");
    }
}

#[test]
fn test_unsafe_cache_hit_shows_in_the_trace() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ResolveOptions {
        unsafe_cache: true,
        ..ts_options()
    });
    let mut ctx = ResolveContext::new();
    resolver
        .resolve(&ContextInfo::default(), &root, "./foo", &mut ctx)
        .unwrap();

    let mut ctx = ResolveContext::with_log();
    resolver
        .resolve(&ContextInfo::default(), &root, "./foo", &mut ctx)
        .unwrap();
    assert!(ctx
        .log_lines()
        .iter()
        .any(|line| line.contains("cached resolution")));
}

#[test]
fn test_trace_log_records_the_pipeline() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::with_log();
    resolver
        .resolve(&ContextInfo::default(), &root, "./dir", &mut ctx)
        .unwrap();
    let lines = ctx.log_lines();
    assert!(!lines.is_empty());
    assert!(lines.iter().any(|line| line.contains("as directory")));
}

#[test]
fn test_failed_resolution_carries_the_trace() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());
    let mut ctx = ResolveContext::with_log();
    let err = resolver
        .resolve(&ContextInfo::default(), &root, "./nope", &mut ctx)
        .unwrap_err();
    match err {
        ResolveError::NotResolved { request, trace, .. } => {
            assert_eq!(request, "./nope");
            assert!(!trace.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dependency_sets_are_reported() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ts_options());

    let mut ctx = ResolveContext::with_dependencies();
    resolver
        .resolve(&ContextInfo::default(), &root, "./foo", &mut ctx)
        .unwrap();
    assert!(ctx
        .file_dependencies
        .as_ref()
        .unwrap()
        .contains(&root.join("foo.ts")));

    let mut ctx = ResolveContext::with_dependencies();
    let _ = resolver.resolve(&ContextInfo::default(), &root, "./nope", &mut ctx);
    assert!(!ctx.missing_dependencies.as_ref().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_canonicalized() {
    let (_dir, root) = fixture();
    write(&root, "real/target.js", "");
    std::os::unix::fs::symlink(root.join("real"), root.join("linked")).unwrap();

    let resolver = resolver(ResolveOptions::default());
    assert_eq!(
        resolve_path(&resolver, &root, "./linked/target.js"),
        root.join("real/target.js")
    );

    let keep_links = self::resolver(ResolveOptions {
        symlinks: false,
        ..ResolveOptions::default()
    });
    assert_eq!(
        resolve_path(&keep_links, &root, "./linked/target.js"),
        root.join("linked/target.js")
    );
}

#[test]
fn test_resolution_over_a_caching_filesystem() {
    let (_dir, root) = extensions_tree();
    let fs = Arc::new(CachedFileSystem::new(Arc::new(NativeFileSystem)));
    let resolver = ResolverFactory::create(ts_options(), fs);

    for request in ["./foo", "./dir", ".", "module"] {
        let first = resolve_path(&resolver, &root, request);
        let second = resolve_path(&resolver, &root, request);
        assert_eq!(first, second, "{request}");
    }
}

#[derive(Debug)]
struct StubPackageManager {
    package: &'static str,
    root: PathBuf,
}

impl PackageManagerApi for StubPackageManager {
    fn resolve_to_unqualified(
        &self,
        package: &str,
        _issuer: &Path,
    ) -> Result<Option<PathBuf>, ResolveError> {
        if package == self.package {
            Ok(Some(self.root.clone()))
        } else {
            Ok(None)
        }
    }
}

#[test]
fn test_package_manager_lookup_bypasses_module_roots() {
    let (_dir, root) = fixture();
    write(&root, "store/pnp-dep/index.js", "");
    write(&root, "node_modules/other-dep/index.js", "");

    let resolver = resolver(ResolveOptions {
        package_manager: Some(Arc::new(StubPackageManager {
            package: "pnp-dep",
            root: root.join("store/pnp-dep"),
        })),
        ..ResolveOptions::default()
    });

    assert_eq!(
        resolve_path(&resolver, &root, "pnp-dep"),
        root.join("store/pnp-dep/index.js")
    );
    // Uncovered packages fall back to the module-root walk.
    assert_eq!(
        resolve_path(&resolver, &root, "other-dep"),
        root.join("node_modules/other-dep/index.js")
    );
}

struct VirtualEntryStep {
    path: PathBuf,
    target: HookId,
}

impl Step for VirtualEntryStep {
    fn name(&self) -> &'static str {
        "VirtualEntryStep"
    }

    fn run(
        &self,
        resolver: &Resolver,
        request: &ResolveRequest,
        ctx: &mut ResolveContext,
    ) -> StepResult {
        if request.request != "./virtual-entry" {
            return Ok(None);
        }
        let mut next = request.clone();
        next.path.clone_from(&self.path);
        next.request = String::new();
        resolver.do_resolve(self.target, next, Some("virtual entry"), ctx)
    }
}

struct VirtualEntryPlugin {
    path: PathBuf,
}

impl ResolvePlugin for VirtualEntryPlugin {
    fn apply(&self, resolver: &mut Resolver) {
        let target = resolver.ensure_hook("resolved");
        let source = resolver.ensure_hook("described-resolve");
        resolver.tap(
            source,
            Box::new(VirtualEntryStep {
                path: self.path.clone(),
                target,
            }),
        );
    }
}

#[test]
fn test_user_plugins_extend_the_pipeline() {
    let (_dir, root) = extensions_tree();
    let resolver = resolver(ResolveOptions {
        plugins: vec![Box::new(VirtualEntryPlugin {
            path: root.join("foo.ts"),
        })],
        ..ts_options()
    });
    // `./virtual-entry` does not exist on disk; the user step answers it.
    assert_eq!(
        resolve_path(&resolver, &root, "./virtual-entry"),
        root.join("foo.ts")
    );
}
