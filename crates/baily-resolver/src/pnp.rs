//! External package-manager lookup.
//!
//! Package managers that do away with `node_modules` trees expose an API
//! mapping `(package, issuer)` to the package's location on disk. The
//! resolver consults it before its own module-root lookup when configured.

use crate::error::ResolveError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Plug-in point for Pnp-style package managers.
pub trait PackageManagerApi: Send + Sync + fmt::Debug {
    /// Map a package name, as requested from `issuer`, to the directory the
    /// package manager installed it in.
    ///
    /// `Ok(None)` means the API does not cover this package and the resolver
    /// should fall back to its own lookup.
    fn resolve_to_unqualified(
        &self,
        package: &str,
        issuer: &Path,
    ) -> Result<Option<PathBuf>, ResolveError>;
}
