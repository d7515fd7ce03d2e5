//! Description file loading.
//!
//! Locates the nearest ancestor description file (e.g. `package.json`) for a
//! path, parses it once and caches the outcome per directory. Entries are
//! invalidated only by an explicit [`DescriptionFileLoader::clear`].

use crate::context::ResolveContext;
use crate::error::ResolveError;
use crate::fs::FileSystem;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A located and parsed description file.
#[derive(Debug, Clone)]
pub struct DescriptionFileInfo {
    /// Absolute path of the file itself.
    pub path: PathBuf,
    /// Its parent directory; every path it describes has this as a prefix.
    pub root: PathBuf,
    /// Parsed contents.
    pub data: Value,
}

#[derive(Debug)]
pub struct DescriptionFileLoader {
    filenames: Vec<String>,
    /// Per-directory outcome; `None` records that the directory itself holds
    /// no description file (ancestors may still).
    cache: RwLock<FxHashMap<PathBuf, Option<Arc<DescriptionFileInfo>>>>,
}

impl DescriptionFileLoader {
    #[must_use]
    pub fn new(filenames: Vec<String>) -> Self {
        Self {
            filenames,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Find the nearest description file at or above `start`.
    ///
    /// When `stop` is given the walk halts after probing that directory; used
    /// to re-check only the span below an already-attached root.
    pub fn load_nearest(
        &self,
        fs: &dyn FileSystem,
        start: &Path,
        stop: Option<&Path>,
        ctx: &mut ResolveContext,
    ) -> Result<Option<Arc<DescriptionFileInfo>>, ResolveError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if let Some(info) = self.load_in(fs, dir, ctx)? {
                return Ok(Some(info));
            }
            if stop == Some(dir) {
                return Ok(None);
            }
            current = dir.parent();
        }
        Ok(None)
    }

    /// Probe a single directory, consulting the cache first.
    fn load_in(
        &self,
        fs: &dyn FileSystem,
        dir: &Path,
        ctx: &mut ResolveContext,
    ) -> Result<Option<Arc<DescriptionFileInfo>>, ResolveError> {
        if let Some(cached) = self.cache.read().unwrap().get(dir) {
            return Ok(cached.clone());
        }

        let mut found = None;
        for filename in &self.filenames {
            let candidate = dir.join(filename);
            match fs.read_file(&candidate) {
                Ok(bytes) => {
                    ctx.add_file_dependency(&candidate);
                    let data: Value = serde_json::from_slice(&bytes).map_err(|source| {
                        ResolveError::InvalidDescriptionFile {
                            path: candidate.clone(),
                            source,
                        }
                    })?;
                    found = Some(Arc::new(DescriptionFileInfo {
                        root: dir.to_path_buf(),
                        path: candidate,
                        data,
                    }));
                    break;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    ctx.add_missing_dependency(&candidate);
                }
                // Directories named like a description file stat as such but
                // fail to read; treat them as absent as well.
                Err(err) if err.kind() == io::ErrorKind::IsADirectory => {
                    ctx.add_missing_dependency(&candidate);
                }
                Err(err) => return Err(ResolveError::io(candidate, err)),
            }
        }

        self.cache
            .write()
            .unwrap()
            .insert(dir.to_path_buf(), found.clone());
        Ok(found)
    }
}
