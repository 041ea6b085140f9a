//! Common test utilities for integration tests.
//!
//! Fixtures here build real directory trees in a temporary location so the
//! detector, the vacate strategies and the session can run against
//! `SystemFileSystem` end to end.

use std::fs;
use std::path::{Path, PathBuf};

use mvguard::{Batch, RenameEntry};

/// A temporary media directory with helpers to populate it.
///
/// The directory is removed when the fixture is dropped.
#[allow(dead_code)]
pub struct MediaDir {
    temp: tempfile::TempDir,
}

#[allow(dead_code)]
impl MediaDir {
    /// Creates an empty media directory.
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().unwrap(),
        }
    }

    /// Root of the media directory.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of `name` inside the media directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Creates a file holding `size` bytes and returns its path.
    pub fn file(&self, name: &str, size: usize) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, vec![b'x'; size]).unwrap();
        path
    }

    /// Creates a directory and returns its path.
    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Builds a batch of `(source name, destination)` pairs with sources
    /// inside the media directory.
    pub fn batch(&self, pairs: &[(&str, &str)]) -> Batch {
        let mut batch = Batch::new();
        for (source, destination) in pairs {
            batch
                .insert(RenameEntry::new(self.path(source), *destination))
                .unwrap();
        }
        batch
    }
}

/// Source paths of a batch, in order.
#[allow(dead_code)]
pub fn sources(batch: &Batch) -> Vec<PathBuf> {
    batch.sources().map(Path::to_path_buf).collect()
}
