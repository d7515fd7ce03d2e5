//! Ambient per-request diagnostics.

use rustc_hash::FxHashSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single trace entry, indented by fork depth.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub depth: usize,
    pub message: String,
}

/// Ordered trace of a resolution attempt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveLog {
    entries: Vec<LogEntry>,
}

impl ResolveLog {
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Render entries with two-space indentation per fork level.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{}{}", "  ".repeat(entry.depth), entry.message))
            .collect()
    }
}

/// Diagnostics passed alongside a request.
///
/// Also owns the live fork stack used for cycle detection; one context must
/// not be shared between concurrently running top-level requests.
#[derive(Debug, Default)]
pub struct ResolveContext {
    log: Option<ResolveLog>,
    /// Every existing path consulted during resolution, when requested.
    pub file_dependencies: Option<FxHashSet<PathBuf>>,
    /// Every absent path whose appearance could change the result.
    pub missing_dependencies: Option<FxHashSet<PathBuf>>,
    pub(crate) stack: FxHashSet<String>,
    pub(crate) depth: usize,
}

impl ResolveContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that collects a trace log.
    #[must_use]
    pub fn with_log() -> Self {
        Self {
            log: Some(ResolveLog::default()),
            ..Self::default()
        }
    }

    /// A context that tracks file and missing dependencies.
    #[must_use]
    pub fn with_dependencies() -> Self {
        Self {
            file_dependencies: Some(FxHashSet::default()),
            missing_dependencies: Some(FxHashSet::default()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn log(&self) -> Option<&ResolveLog> {
        self.log.as_ref()
    }

    /// Rendered trace lines, empty when no log was requested.
    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.log.as_ref().map(ResolveLog::lines).unwrap_or_default()
    }

    pub(crate) fn record(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::trace!(depth = self.depth, "{message}");
        if let Some(log) = &mut self.log {
            log.entries.push(LogEntry {
                depth: self.depth,
                message: message.to_string(),
            });
        }
    }

    pub(crate) fn add_file_dependency(&mut self, path: &Path) {
        if let Some(deps) = &mut self.file_dependencies {
            deps.insert(path.to_path_buf());
        }
    }

    pub(crate) fn add_missing_dependency(&mut self, path: &Path) {
        if let Some(deps) = &mut self.missing_dependencies {
            deps.insert(path.to_path_buf());
        }
    }
}
