//! Destination path resolution.
//!
//! A rename mapping may name its destination relative to the source file.
//! Every check in the conflict detector runs against the absolute path
//! produced here.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::normalize;

/// Turns a raw destination into an absolute path.
///
/// Implementations must be pure: the same `(source, destination)` pair always
/// resolves to the same path within one session.
pub trait DestinationResolver {
    /// Resolve `destination` as given for the entry whose source is `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvableDestination`] when no absolute path can be
    /// produced for this entry.
    fn resolve(&self, source: &Path, destination: &Path) -> Result<PathBuf>;
}

/// Default resolver: relative destinations are relative to the source's
/// parent directory.
///
/// # Examples
///
/// ```
/// use mvguard::path::{DestinationResolver, PathResolver};
/// use std::path::Path;
///
/// let resolver = PathResolver::new();
///
/// let dest = resolver
///     .resolve(Path::new("/media/incoming/x.mkv"), Path::new("../tv/Show - 1x01.mkv"))
///     .unwrap();
/// assert_eq!(dest, Path::new("/media/tv/Show - 1x01.mkv"));
///
/// let dest = resolver
///     .resolve(Path::new("/media/incoming/x.mkv"), Path::new("/archive/x.mkv"))
///     .unwrap();
/// assert_eq!(dest, Path::new("/archive/x.mkv"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    /// Create a new path resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DestinationResolver for PathResolver {
    fn resolve(&self, source: &Path, destination: &Path) -> Result<PathBuf> {
        let unresolvable = |reason: String| Error::UnresolvableDestination {
            source_path: source.to_path_buf(),
            reason,
        };

        if destination.as_os_str().is_empty() {
            return Err(unresolvable("destination is empty".to_string()));
        }

        let base = source
            .parent()
            .filter(|parent| parent.is_absolute())
            .ok_or_else(|| unresolvable("source has no absolute parent directory".to_string()))?;

        normalize::normalize_against(base, destination).map_err(|e| match e {
            Error::InvalidPath { reason, .. } => unresolvable(reason),
            other => unresolvable(other.to_string()),
        })
    }
}

impl<F> DestinationResolver for F
where
    F: Fn(&Path, &Path) -> Result<PathBuf>,
{
    fn resolve(&self, source: &Path, destination: &Path) -> Result<PathBuf> {
        self(source, destination)
    }
}
