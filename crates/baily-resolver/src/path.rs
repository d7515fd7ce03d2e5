//! Lexical path algebra.
//!
//! Joining and normalization happen without filesystem access; `.` and `..`
//! components are resolved purely textually so that non-existent candidate
//! paths can still be produced and probed.

use crate::kind::PathKind;
use std::path::{Component, Path, PathBuf};

/// Join a request onto a base directory.
///
/// Absolute requests (posix or windows) replace the base entirely; everything
/// else is appended and normalized.
#[must_use]
pub fn join(base: &Path, request: &str) -> PathBuf {
    if request.is_empty() {
        return normalize(base);
    }
    if PathKind::of(request).is_absolute() {
        normalize(Path::new(request))
    } else {
        normalize(&base.join(request))
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` above the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            Component::CurDir => {}
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
