//! Rename batches.
//!
//! A [`Batch`] is the caller's proposed mapping from existing source paths to
//! destinations as written. Sources are unique keys and insertion order is
//! preserved: it decides report order and breaks ties between equally ranked
//! duplicate candidates.
//!
//! The conflict engine never mutates a caller's batch. Workflows that shrink
//! a batch (overrides) work on copies, and the final executable mapping is
//! produced by [`filter::exclude`].

pub mod filter;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use filter::{exclude, exclude_sources};

/// One proposed rename: a source path and its raw destination.
///
/// # Examples
///
/// ```
/// use mvguard::RenameEntry;
///
/// let entry = RenameEntry::new("/media/a.avi", "Show - 1x01.avi");
/// assert_eq!(entry.source().to_str(), Some("/media/a.avi"));
/// assert_eq!(entry.destination().to_str(), Some("Show - 1x01.avi"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenameEntry {
    source: PathBuf,
    destination: PathBuf,
}

impl RenameEntry {
    /// Create an entry from a source path and its destination as written.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// The source path (the batch key).
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The destination as given, possibly relative to the source.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl fmt::Display for RenameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \u{2794} {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// A [`RenameEntry`] together with its absolute destination.
///
/// Computed fresh for every detection pass and never stored in a [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    entry: RenameEntry,
    resolved: PathBuf,
}

impl ResolvedEntry {
    /// Pair an entry with its resolved destination.
    #[must_use]
    pub fn new(entry: RenameEntry, resolved: PathBuf) -> Self {
        Self { entry, resolved }
    }

    /// The underlying entry.
    #[must_use]
    pub fn entry(&self) -> &RenameEntry {
        &self.entry
    }

    /// The source path.
    #[must_use]
    pub fn source(&self) -> &Path {
        self.entry.source()
    }

    /// The absolute destination path.
    #[must_use]
    pub fn resolved(&self) -> &Path {
        &self.resolved
    }

    /// Returns true if the entry renames a path onto itself.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.resolved == self.entry.source
    }
}

/// An ordered, source-unique collection of rename entries.
///
/// # Examples
///
/// ```
/// use mvguard::Batch;
///
/// let batch = Batch::from_pairs([
///     ("/media/a.avi", "A.avi"),
///     ("/media/b.avi", "B.avi"),
/// ])
/// .unwrap();
///
/// assert_eq!(batch.len(), 2);
/// assert!(batch.contains(std::path::Path::new("/media/b.avi")));
///
/// // Sources are unique keys.
/// assert!(Batch::from_pairs([("/media/a.avi", "A.avi"), ("/media/a.avi", "C.avi")]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<RenameEntry>,
    index: HashMap<PathBuf, usize>,
}

impl Batch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from `(source, destination)` pairs, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or repeated source (see [`Batch::insert`]).
    pub fn from_pairs<I, S, D>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        let mut batch = Self::new();
        for (source, destination) in pairs {
            batch.insert(RenameEntry::new(source, destination))?;
        }
        Ok(batch)
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the source is not absolute and
    /// [`Error::DuplicateSource`] if the source is already present.
    pub fn insert(&mut self, entry: RenameEntry) -> Result<()> {
        if !entry.source().is_absolute() {
            return Err(Error::InvalidPath {
                path: entry.source().to_path_buf(),
                reason: "Source paths must be absolute".to_string(),
            });
        }
        if self.index.contains_key(entry.source()) {
            return Err(Error::DuplicateSource {
                path: entry.source().to_path_buf(),
            });
        }

        self.index
            .insert(entry.source().to_path_buf(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Remove the entry for `source`, preserving the order of the rest.
    pub fn remove(&mut self, source: &Path) -> Option<RenameEntry> {
        let position = self.index.remove(source)?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Look up the entry for `source`.
    #[must_use]
    pub fn get(&self, source: &Path) -> Option<&RenameEntry> {
        self.index.get(source).map(|&i| &self.entries[i])
    }

    /// Returns true if `source` is a key of this batch.
    #[must_use]
    pub fn contains(&self, source: &Path) -> bool {
        self.index.contains_key(source)
    }

    /// Insertion position of `source`.
    #[must_use]
    pub fn position(&self, source: &Path) -> Option<usize> {
        self.index.get(source).copied()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RenameEntry> {
        self.entries.iter()
    }

    /// Iterate over source paths in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(RenameEntry::source)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this batch without the given sources.
    #[must_use]
    pub fn without<'a, I>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut copy = self.clone();
        for source in sources {
            copy.remove(source);
        }
        copy
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a RenameEntry;
    type IntoIter = std::slice::Iter<'a, RenameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Batch {
        Batch::from_pairs([
            ("/m/a.avi", "A.avi"),
            ("/m/b.avi", "B.avi"),
            ("/m/c.avi", "C.avi"),
        ])
        .unwrap()
    }

    #[test]
    fn test_insert_rejects_relative_source() {
        let mut batch = Batch::new();
        let err = batch
            .insert(RenameEntry::new("relative.avi", "x.avi"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_source() {
        let mut batch = sample();
        let err = batch
            .insert(RenameEntry::new("/m/b.avi", "other.avi"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSource { .. }));
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_order_is_preserved() {
        let batch = sample();
        let sources: Vec<_> = batch.sources().collect();
        assert_eq!(
            sources,
            vec![
                Path::new("/m/a.avi"),
                Path::new("/m/b.avi"),
                Path::new("/m/c.avi")
            ]
        );
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut batch = sample();
        let removed = batch.remove(Path::new("/m/a.avi")).unwrap();
        assert_eq!(removed.destination(), Path::new("A.avi"));

        assert_eq!(batch.position(Path::new("/m/b.avi")), Some(0));
        assert_eq!(batch.position(Path::new("/m/c.avi")), Some(1));
        assert_eq!(
            batch.get(Path::new("/m/c.avi")).unwrap().destination(),
            Path::new("C.avi")
        );
        assert!(batch.remove(Path::new("/m/a.avi")).is_none());
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let batch = sample();
        let smaller = batch.without([Path::new("/m/b.avi")]);
        assert_eq!(batch.len(), 3);
        assert_eq!(smaller.len(), 2);
        assert!(!smaller.contains(Path::new("/m/b.avi")));
    }

    #[test]
    fn test_resolved_entry_noop() {
        let entry = RenameEntry::new("/m/a.avi", "a.avi");
        let resolved = ResolvedEntry::new(entry, PathBuf::from("/m/a.avi"));
        assert!(resolved.is_noop());
    }

    #[test]
    fn test_entry_display() {
        let entry = RenameEntry::new("/m/a.avi", "b.avi");
        assert_eq!(entry.to_string(), "/m/a.avi \u{2794} b.avi");
    }
}
