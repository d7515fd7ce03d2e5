//! The step library.
//!
//! Each step is a small [`crate::hooks::Step`] implementation installed on a
//! hook by the factory. A step transforms a request and forks it onward; no
//! step knows the full pipeline shape.

mod alias;
mod alias_field;
mod append;
mod description_file;
mod directory_exists;
mod file_exists;
mod file_kind;
mod join_request;
mod join_request_part;
mod main_field;
mod module_kind;
mod modules_in_hierarchy;
mod modules_in_root;
mod next;
mod package_manager_lookup;
mod parse;
mod result;
mod symlink;
mod try_next;
mod unsafe_cache;
mod use_file;

pub use alias::AliasPlugin;
pub use alias_field::AliasFieldPlugin;
pub use append::AppendPlugin;
pub use description_file::DescriptionFilePlugin;
pub use directory_exists::DirectoryExistsPlugin;
pub use file_exists::FileExistsPlugin;
pub use file_kind::FileKindPlugin;
pub use join_request::JoinRequestPlugin;
pub use join_request_part::JoinRequestPartPlugin;
pub use main_field::MainFieldPlugin;
pub use module_kind::ModuleKindPlugin;
pub use modules_in_hierarchy::ModulesInHierarchicDirectoriesPlugin;
pub use modules_in_root::ModulesInRootPlugin;
pub use next::NextPlugin;
pub use package_manager_lookup::PackageManagerLookupPlugin;
pub use parse::ParsePlugin;
pub use result::ResultPlugin;
pub use symlink::SymlinkPlugin;
pub use try_next::TryNextPlugin;
pub use unsafe_cache::UnsafeCachePlugin;
pub use use_file::UseFilePlugin;
