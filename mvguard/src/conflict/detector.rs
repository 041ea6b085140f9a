//! Whole-batch conflict detection.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::batch::{Batch, RenameEntry, ResolvedEntry};
use crate::error::Result;
use crate::fs::{FileSystem, SystemFileSystem};
use crate::path::{DestinationResolver, PathResolver};

use super::duplicates::{DestinationGroups, DuplicateResolver};
use super::messages;
use super::quality::{InputOrder, QualityOrder};
use super::{Conflict, IssueKind};

/// Scans a batch and reports every entry that is unsafe to execute.
///
/// The detector owns its collaborators: the destination resolver, the
/// filesystem probe and the quality order. Detection is a pure function of
/// the batch and the filesystem state at call time.
///
/// # Examples
///
/// ```
/// use mvguard::conflict::{ConflictDetector, IssueKind};
/// use mvguard::fs::MockFileSystem;
/// use mvguard::Batch;
///
/// let fs = MockFileSystem::new().with_file("/m/a.avi").with_file("/m/Y.avi");
/// let detector = ConflictDetector::new().with_filesystem(fs);
///
/// let batch = Batch::from_pairs([("/m/a.avi", "Y.avi")]).unwrap();
/// let conflicts = detector.detect(&batch).unwrap();
///
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].kinds().collect::<Vec<_>>(), vec![IssueKind::FileExists]);
/// assert!(conflicts[0].is_overridable());
/// ```
pub struct ConflictDetector {
    resolver: Box<dyn DestinationResolver>,
    filesystem: Box<dyn FileSystem>,
    quality: Box<dyn QualityOrder>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConflictDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictDetector").finish_non_exhaustive()
    }
}

impl ConflictDetector {
    /// Detector with the default path resolver, the real filesystem and
    /// input-order ranking.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: Box::new(PathResolver::new()),
            filesystem: Box::new(SystemFileSystem),
            quality: Box::new(InputOrder),
        }
    }

    /// Replace the destination resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl DestinationResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace the filesystem probe.
    #[must_use]
    pub fn with_filesystem(mut self, filesystem: impl FileSystem + 'static) -> Self {
        self.filesystem = Box::new(filesystem);
        self
    }

    /// Replace the quality order used to break duplicate ties.
    #[must_use]
    pub fn with_quality_order(mut self, order: impl QualityOrder + 'static) -> Self {
        self.quality = Box::new(order);
        self
    }

    /// Resolve one entry's destination.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's failure for this entry.
    pub fn resolve_entry(&self, entry: &RenameEntry) -> Result<ResolvedEntry> {
        let resolved = self.resolver.resolve(entry.source(), entry.destination())?;
        Ok(ResolvedEntry::new(entry.clone(), resolved))
    }

    /// Resolve every entry of `batch`, in batch order.
    ///
    /// # Errors
    ///
    /// Fails on the first entry whose destination cannot be resolved.
    pub fn resolve_all(&self, batch: &Batch) -> Result<Vec<ResolvedEntry>> {
        batch.iter().map(|entry| self.resolve_entry(entry)).collect()
    }

    /// Detect conflicts over the whole batch, in batch order.
    ///
    /// Each source appears in at most one conflict, carrying every issue
    /// that applies to it.
    ///
    /// # Errors
    ///
    /// Only resolver failures are errors. Structural problems are reported
    /// as [`Conflict`]s.
    pub fn detect(&self, batch: &Batch) -> Result<Vec<Conflict>> {
        self.detect_with_claims(batch, &[])
    }

    /// Detection where `claims` already hold their destinations.
    ///
    /// Claims are entries that left the batch after a successful override:
    /// they will still be renamed, so no pending entry may take their
    /// destination or their source.
    pub(crate) fn detect_with_claims(
        &self,
        batch: &Batch,
        claims: &[ResolvedEntry],
    ) -> Result<Vec<Conflict>> {
        let entries = self.resolve_all(batch)?;
        let groups = DuplicateResolver::new(self.quality.as_ref())
            .with_claims(claims)
            .group_by_destination(&entries);
        let resolved_by_source: HashMap<&Path, &Path> = entries
            .iter()
            .chain(claims)
            .map(|e| (e.source(), e.resolved()))
            .collect();

        let conflicts: Vec<Conflict> = entries
            .iter()
            .filter_map(|entry| self.inspect(entry, &groups, &resolved_by_source))
            .collect();

        log::debug!(
            "detected {} conflicts in a batch of {} entries",
            conflicts.len(),
            batch.len()
        );
        Ok(conflicts)
    }

    fn inspect(
        &self,
        entry: &ResolvedEntry,
        groups: &DestinationGroups,
        resolved_by_source: &HashMap<&Path, &Path>,
    ) -> Option<Conflict> {
        let source = entry.source();
        let destination = entry.resolved();
        let mut issues = BTreeMap::new();

        if !has_extension(destination) && self.filesystem.is_file(source) {
            issues.insert(
                IssueKind::MissingExtension,
                messages::missing_extension(destination),
            );
        }

        if let Some(chosen) = groups.chosen(destination) {
            if groups.is_contested(destination) && chosen.source() != source {
                let competitors: Vec<&Path> = groups
                    .members(destination)
                    .iter()
                    .map(ResolvedEntry::source)
                    .collect();
                issues.insert(
                    IssueKind::Duplicate,
                    messages::duplicate(&competitors, destination, chosen.source(), source),
                );
            }
        }

        if !entry.is_noop() {
            if let Some(next) = resolved_by_source.get(destination) {
                issues.insert(
                    IssueKind::Overlap,
                    messages::overlap(source, destination, next),
                );
            }

            if self.filesystem.exists(destination) {
                issues.insert(IssueKind::FileExists, messages::file_exists(destination));
            }
        }

        Conflict::new(source, destination, issues)
    }
}

/// Longest suffix still taken for a file extension.
const MAX_EXTENSION_LEN: usize = 16;

/// An extension is a short ASCII alphanumeric suffix after the last dot, so
/// dotted titles such as `Mr. Robot - 1x01` do not count as having one.
fn has_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            (1..=MAX_EXTENSION_LEN).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}
