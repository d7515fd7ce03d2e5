use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving a request.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A filesystem operation failed for a reason other than the entry being
    /// absent. Absent entries are recovered locally by the pipeline and never
    /// surface as this variant.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse description file {path}: {source}")]
    InvalidDescriptionFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A fork re-entered a `(hook, request)` pair that is still live on the
    /// fork stack.
    #[error("recursion while resolving '{request}' via hook '{hook}'")]
    Recursion { hook: String, request: String },

    #[error("invalid request '{request}': {reason}")]
    BadRequest { request: String, reason: String },

    /// The pipeline exhausted every alternative without producing a result.
    #[error("cannot resolve '{request}' in '{}'", .path.display())]
    NotResolved {
        request: String,
        path: PathBuf,
        /// Rendered trace lines, populated when the caller requested a log.
        trace: Vec<String>,
    },
}

impl ResolveError {
    pub(crate) fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }

    pub(crate) fn not_resolved(request: impl Into<String>, path: PathBuf) -> Self {
        Self::NotResolved {
            request: request.into(),
            path,
            trace: Vec::new(),
        }
    }
}
