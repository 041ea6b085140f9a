//! Filesystem probes used by conflict detection.
//!
//! Detection needs two facts about the filesystem: whether a destination is
//! already occupied, and whether a source is a plain file. Both are behind
//! the [`FileSystem`] trait so tests can describe a filesystem state
//! explicitly instead of creating files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Read-only view of the filesystem as seen by the conflict detector.
///
/// Both methods are trusted primitives: an I/O failure while probing is
/// reported as `false`.
pub trait FileSystem {
    /// Returns true if anything (file, directory, or symlink target) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns true if `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Production implementation backed by `std::fs`.
///
/// # Examples
///
/// ```
/// use mvguard::fs::{FileSystem, SystemFileSystem};
/// use std::path::Path;
///
/// let fs = SystemFileSystem;
/// assert!(!fs.exists(Path::new("/definitely/not/here.mkv")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory filesystem state for deterministic tests.
///
/// # Examples
///
/// ```
/// use mvguard::fs::{FileSystem, MockFileSystem};
/// use std::path::Path;
///
/// let fs = MockFileSystem::new()
///     .with_file("/media/a.mkv")
///     .with_dir("/media/Show");
///
/// assert!(fs.is_file(Path::new("/media/a.mkv")));
/// assert!(fs.exists(Path::new("/media/Show")));
/// assert!(!fs.is_file(Path::new("/media/Show")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl MockFileSystem {
    /// Create an empty mock filesystem (nothing exists).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Add a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Remove whatever exists at `path`.
    pub fn remove(&mut self, path: &Path) {
        self.files.remove(path);
        self.dirs.remove(path);
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path) || self.dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }
}
