//! Declarative pipeline assembly.
//!
//! Turns an options record into a fully-tapped [`Resolver`]. Everything here
//! is configuration: the resolution semantics live in the steps, this module
//! only decides which steps exist and in which order they are consulted.
//! That order is load-bearing: aliases must be able to rewrite a module
//! request into a relative one before module-kind routing sees it, and the
//! extension-less probe must precede appended extensions so an explicit
//! extension beats a synthesized one.

use crate::fs::FileSystem;
use crate::hooks::HookId;
use crate::kind::PathKind;
use crate::options::ResolveOptions;
use crate::plugins::{
    AliasFieldPlugin, AliasPlugin, AppendPlugin, DescriptionFilePlugin, DirectoryExistsPlugin,
    FileExistsPlugin, FileKindPlugin, JoinRequestPartPlugin, JoinRequestPlugin, MainFieldPlugin,
    ModuleKindPlugin, ModulesInHierarchicDirectoriesPlugin, ModulesInRootPlugin, NextPlugin,
    PackageManagerLookupPlugin, ParsePlugin, ResultPlugin, SymlinkPlugin, TryNextPlugin,
    UnsafeCachePlugin, UseFilePlugin,
};
use crate::resolver::Resolver;
use std::path::PathBuf;
use std::sync::Arc;

pub struct ResolverFactory;

impl ResolverFactory {
    /// Build a resolver over `fs` with the pipeline `options` describes.
    #[must_use]
    pub fn create(options: ResolveOptions, fs: Arc<dyn FileSystem>) -> Resolver {
        let mut resolver = Resolver::new(fs);
        Self::install(options, &mut resolver);
        resolver
    }

    /// Tap the full pipeline onto an existing resolver.
    pub fn install(options: ResolveOptions, resolver: &mut Resolver) {
        resolver.set_description_filenames(options.description_files.clone());

        let resolve = resolver.ensure_hook("resolve");
        let new_resolve = resolver.ensure_hook("new-resolve");
        let parsed_resolve = resolver.ensure_hook("parsed-resolve");
        let described_resolve = resolver.ensure_hook("described-resolve");
        let raw_module = resolver.ensure_hook("raw-module");
        let module = resolver.ensure_hook("module");
        let resolve_in_directory = resolver.ensure_hook("resolve-in-directory");
        let resolve_in_existing_directory =
            resolver.ensure_hook("resolve-in-existing-directory");
        let relative = resolver.ensure_hook("relative");
        let described_relative = resolver.ensure_hook("described-relative");
        let directory = resolver.ensure_hook("directory");
        let undescribed_existing_directory =
            resolver.ensure_hook("undescribed-existing-directory");
        let existing_directory = resolver.ensure_hook("existing-directory");
        let undescribed_raw_file = resolver.ensure_hook("undescribed-raw-file");
        let raw_file = resolver.ensure_hook("raw-file");
        let file = resolver.ensure_hook("file");
        let existing_file = resolver.ensure_hook("existing-file");
        let resolved = resolver.ensure_hook("resolved");

        // Entry: the unsafe cache, when enabled, owns the front of the
        // pipeline and forwards misses.
        let parse_source = if options.unsafe_cache {
            resolver.tap(
                resolve,
                Box::new(UnsafeCachePlugin::new(
                    new_resolve,
                    options.cache_predicate.clone(),
                    options.cache_with_context,
                )),
            );
            new_resolve
        } else {
            resolve
        };
        resolver.tap(parse_source, Box::new(ParsePlugin::new(parsed_resolve)));

        resolver.tap(
            parsed_resolve,
            Box::new(DescriptionFilePlugin::scan(described_resolve)),
        );

        // Aliases before module-kind routing: a rewrite may turn a bare
        // module into a relative request.
        for entry in &options.alias {
            resolver.tap(
                described_resolve,
                Box::new(AliasPlugin::new(entry.clone(), resolve)),
            );
        }
        for field in &options.alias_fields {
            resolver.tap(
                described_resolve,
                Box::new(AliasFieldPlugin::new(field.clone(), resolve)),
            );
        }
        resolver.tap(described_resolve, Box::new(ModuleKindPlugin::new(raw_module)));
        resolver.tap(described_resolve, Box::new(JoinRequestPlugin::new(relative)));

        if let Some(api) = &options.package_manager {
            resolver.tap(
                raw_module,
                Box::new(PackageManagerLookupPlugin::new(api.clone(), relative)),
            );
        }

        // Module roots: consecutive bare names form one hierarchic group in
        // which the later entry wins, absolute paths are single roots.
        let mut group: Vec<String> = Vec::new();
        for entry in &options.modules {
            if PathKind::of(entry).is_absolute() {
                flush_module_group(resolver, &mut group, raw_module, module);
                resolver.tap(
                    raw_module,
                    Box::new(ModulesInRootPlugin::new(PathBuf::from(entry), module)),
                );
            } else {
                group.push(entry.clone());
            }
        }
        flush_module_group(resolver, &mut group, raw_module, module);

        resolver.tap(module, Box::new(JoinRequestPartPlugin::new(resolve_in_directory)));

        if !options.resolve_to_context {
            resolver.tap(
                resolve_in_directory,
                Box::new(FileKindPlugin::new(
                    undescribed_raw_file,
                    Some("single file module"),
                )),
            );
        }
        resolver.tap(
            resolve_in_directory,
            Box::new(DirectoryExistsPlugin::new(resolve_in_existing_directory)),
        );
        resolver.tap(
            resolve_in_existing_directory,
            Box::new(JoinRequestPlugin::new(relative)),
        );

        resolver.tap(
            relative,
            Box::new(DescriptionFilePlugin::scan(described_relative)),
        );

        if !options.resolve_to_context {
            resolver.tap(
                described_relative,
                Box::new(FileKindPlugin::new(raw_file, None)),
            );
        }
        resolver.tap(
            described_relative,
            Box::new(TryNextPlugin::new(directory, "as directory")),
        );

        resolver.tap(
            directory,
            Box::new(DirectoryExistsPlugin::new(undescribed_existing_directory)),
        );

        if options.resolve_to_context {
            resolver.tap(
                undescribed_existing_directory,
                Box::new(NextPlugin::new(resolved)),
            );
        } else {
            resolver.tap(
                undescribed_existing_directory,
                Box::new(DescriptionFilePlugin::attach(existing_directory)),
            );
            for filename in &options.main_files {
                resolver.tap(
                    undescribed_existing_directory,
                    Box::new(UseFilePlugin::new(filename.clone(), undescribed_raw_file)),
                );
            }

            for field in &options.main_fields {
                resolver.tap(
                    existing_directory,
                    Box::new(MainFieldPlugin::new(
                        field.clone(),
                        resolve_in_existing_directory,
                    )),
                );
            }
            for filename in &options.main_files {
                resolver.tap(
                    existing_directory,
                    Box::new(UseFilePlugin::new(filename.clone(), undescribed_raw_file)),
                );
            }

            resolver.tap(
                undescribed_raw_file,
                Box::new(DescriptionFilePlugin::attach(raw_file)),
            );

            // Explicit extensions beat synthesized ones.
            if !options.enforce_extension {
                resolver.tap(raw_file, Box::new(TryNextPlugin::new(file, "no extension")));
            }
            for extension in &options.extensions {
                resolver.tap(
                    raw_file,
                    Box::new(AppendPlugin::new(extension.clone(), file)),
                );
            }

            for entry in &options.alias {
                resolver.tap(file, Box::new(AliasPlugin::new(entry.clone(), resolve)));
            }
            for field in &options.alias_fields {
                resolver.tap(file, Box::new(AliasFieldPlugin::new(field.clone(), resolve)));
            }
            resolver.tap(file, Box::new(FileExistsPlugin::new(existing_file)));

            if options.symlinks {
                resolver.tap(existing_file, Box::new(SymlinkPlugin::new(existing_file)));
            }
            resolver.tap(existing_file, Box::new(NextPlugin::new(resolved)));
        }

        resolver.tap(resolved, Box::new(ResultPlugin));

        for plugin in &options.plugins {
            plugin.apply(resolver);
        }
    }
}

fn flush_module_group(
    resolver: &mut Resolver,
    group: &mut Vec<String>,
    source: HookId,
    target: HookId,
) {
    if group.is_empty() {
        return;
    }
    // Later configuration wins within a directory level, so probe in
    // reverse order under first-success bail.
    let directories: Vec<String> = group.drain(..).rev().collect();
    resolver.tap(
        source,
        Box::new(ModulesInHierarchicDirectoriesPlugin::new(directories, target)),
    );
}
