//! Filesystem port.
//!
//! The pipeline only sees this trait; `NativeFileSystem` adapts `std::fs`.
//! "Not found" must stay distinguishable from other failures: callers match
//! on `io::ErrorKind::NotFound` to recover locally.

use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// What a path points at, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// Abstract filesystem consumed by the resolver.
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Stat a path, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileKind>;

    /// List the entry names of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Read a file's contents.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read a symlink target. Fails when the path is not a symlink.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// `std::fs`-backed filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileKind> {
        let meta = std::fs::metadata(path)?;
        Ok(if meta.is_file() {
            FileKind::File
        } else if meta.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}

/// Memoizing wrapper over another filesystem.
///
/// Caches stat and readlink outcomes, including negative ones; entries live
/// until [`CachedFileSystem::clear`]. Reads pass through, description files
/// have their own cache.
#[derive(Debug)]
pub struct CachedFileSystem {
    inner: Arc<dyn FileSystem>,
    stats: RwLock<FxHashMap<PathBuf, Option<FileKind>>>,
    links: RwLock<FxHashMap<PathBuf, Option<PathBuf>>>,
}

impl CachedFileSystem {
    #[must_use]
    pub fn new(inner: Arc<dyn FileSystem>) -> Self {
        Self {
            inner,
            stats: RwLock::new(FxHashMap::default()),
            links: RwLock::new(FxHashMap::default()),
        }
    }

    /// Drop all memoized entries.
    pub fn clear(&self) {
        self.stats.write().unwrap().clear();
        self.links.write().unwrap().clear();
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

impl FileSystem for CachedFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileKind> {
        if let Some(cached) = self.stats.read().unwrap().get(path) {
            return match cached {
                Some(kind) => Ok(*kind),
                None => Err(not_found(path)),
            };
        }
        match self.inner.stat(path) {
            Ok(kind) => {
                self.stats
                    .write()
                    .unwrap()
                    .insert(path.to_path_buf(), Some(kind));
                Ok(kind)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.stats.write().unwrap().insert(path.to_path_buf(), None);
                Err(err)
            }
            // Transient failures stay uncached.
            Err(err) => Err(err),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.inner.read_dir(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner.read_file(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        if let Some(cached) = self.links.read().unwrap().get(path) {
            return match cached {
                Some(target) => Ok(target.clone()),
                None => Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a symlink", path.display()),
                )),
            };
        }
        match self.inner.read_link(path) {
            Ok(target) => {
                self.links
                    .write()
                    .unwrap()
                    .insert(path.to_path_buf(), Some(target.clone()));
                Ok(target)
            }
            Err(err) => {
                // Negative entries collapse every failure kind; the symlink
                // walk only distinguishes "is a link" from "is not".
                self.links.write().unwrap().insert(path.to_path_buf(), None);
                Err(err)
            }
        }
    }
}
