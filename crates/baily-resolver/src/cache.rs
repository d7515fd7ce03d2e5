//! Unsafe-cache fingerprinting.
//!
//! "Unsafe" because entries are never invalidated by filesystem changes; the
//! cache lives and dies with its resolver, so distinct option sets can never
//! share one.

use crate::request::ResolveRequest;
use std::path::PathBuf;

/// Stable fingerprint of a request at the pipeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    issuer: Option<String>,
    path: PathBuf,
    request: String,
    query: String,
    fragment: String,
    directory: bool,
}

impl CacheKey {
    #[must_use]
    pub fn new(request: &ResolveRequest, with_context: bool) -> Self {
        Self {
            issuer: if with_context {
                request.issuer.clone()
            } else {
                None
            },
            path: request.path.clone(),
            request: request.request.clone(),
            query: request.query.clone(),
            fragment: request.fragment.clone(),
            directory: request.directory,
        }
    }
}
