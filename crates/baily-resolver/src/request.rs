//! The unit of work carried through the pipeline.

use crate::description::DescriptionFileInfo;
use crate::kind::PathKind;
use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Ambient information about the caller of a top-level resolution.
#[derive(Debug, Clone, Default)]
pub struct ContextInfo {
    /// The module that issued the request, if known.
    pub issuer: Option<String>,
}

/// A partially-resolved request.
///
/// Steps never mutate a request in place; they clone it, override fields and
/// fork the copy into another hook.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// The absolute directory (or candidate file path, in the later stages)
    /// currently under consideration.
    pub path: PathBuf,
    /// The remaining textual request. Empty once it has been merged into
    /// `path`.
    pub request: String,
    /// Trailing `?...` part of the original identifier, without the `?`.
    pub query: String,
    /// Trailing `#...` part of the original identifier, without the `#`.
    pub fragment: String,
    /// True iff `request` starts with a bare-module identifier.
    pub module: bool,
    /// True iff the original request ended with `/`.
    pub directory: bool,
    /// Description file attached to the current `path`, if any.
    pub description_file: Option<Arc<DescriptionFileInfo>>,
    /// Issuer carried from the top-level call, used in cache keys.
    pub issuer: Option<String>,
    /// Opaque markers added by individual steps to break cycles.
    pub markers: FxHashSet<String>,
}

impl ResolveRequest {
    #[must_use]
    pub fn new(path: PathBuf, request: String, issuer: Option<String>) -> Self {
        Self {
            path,
            request,
            query: String::new(),
            fragment: String::new(),
            module: false,
            directory: false,
            description_file: None,
            issuer,
            markers: FxHashSet::default(),
        }
    }

    /// Render `request?query#fragment` for logs and fork fingerprints.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = self.request.clone();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&self.fragment);
        }
        if self.directory && !out.ends_with('/') {
            out.push('/');
        }
        out
    }

    /// `path` expressed relative to the attached description file root, in
    /// `./a/b` form. `Some(".")` when `path` is the root itself.
    #[must_use]
    pub fn relative_path(&self) -> Option<String> {
        let description = self.description_file.as_ref()?;
        let rel = self.path.strip_prefix(&description.root).ok()?;
        let rel = rel.to_string_lossy();
        if rel.is_empty() {
            Some(".".to_string())
        } else {
            Some(format!("./{}", rel.replace('\\', "/")))
        }
    }
}

/// Result of splitting an identifier into its request, query and fragment
/// parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    pub request: String,
    pub query: String,
    pub fragment: String,
    pub directory: bool,
}

/// Split an identifier.
///
/// The first `?` starts the query; the first `#` starts the fragment, except
/// at position 0 where it marks an internal request. A query that appears
/// after the fragment belongs to the fragment. A trailing `/` on the request
/// part sets the directory flag and is stripped.
#[must_use]
pub fn parse_identifier(identifier: &str) -> ParsedIdentifier {
    let mut query_start = None;
    let mut fragment_start = None;
    for (i, c) in identifier.char_indices() {
        match c {
            '?' if query_start.is_none() && fragment_start.is_none() => query_start = Some(i),
            '#' if fragment_start.is_none() && i != 0 => fragment_start = Some(i),
            _ => {}
        }
    }

    let request_end = match (query_start, fragment_start) {
        (Some(query), _) => query,
        (None, Some(fragment)) => fragment,
        (None, None) => identifier.len(),
    };
    let mut request = &identifier[..request_end];
    let query = match (query_start, fragment_start) {
        (Some(q), Some(f)) => &identifier[q + 1..f],
        (Some(q), None) => &identifier[q + 1..],
        (None, _) => "",
    };
    let fragment = match fragment_start {
        Some(f) => &identifier[f + 1..],
        None => "",
    };

    let directory = request.ends_with('/');
    if let Some(stripped) = request.strip_suffix('/') {
        // A bare "/" stays as-is; it still names the root directory.
        if !stripped.is_empty() {
            request = stripped;
        }
    }

    ParsedIdentifier {
        request: request.to_string(),
        query: query.to_string(),
        fragment: fragment.to_string(),
        directory,
    }
}

/// Split a bare module request into its package name and subpath remainder.
///
/// Scoped packages keep their first two segments: `@scope/pkg/sub` splits
/// into `@scope/pkg` and `sub`.
#[must_use]
pub fn split_package(request: &str) -> (&str, &str) {
    if request.starts_with('@') {
        let mut slashes = 0;
        for (i, c) in request.char_indices() {
            if c == '/' {
                slashes += 1;
                if slashes == 2 {
                    return (&request[..i], &request[i + 1..]);
                }
            }
        }
        return (request, "");
    }

    match request.find('/') {
        Some(pos) => (&request[..pos], &request[pos + 1..]),
        None => (request, ""),
    }
}

/// True iff a request classifies as a bare module identifier.
#[must_use]
pub fn is_module_request(request: &str) -> bool {
    matches!(PathKind::of(request), PathKind::Normal)
}
