//! Override workflow: vacate occupied destinations, then re-detect.
//!
//! Only conflicts whose single issue is [`IssueKind::FileExists`] may be
//! overridden. A successful vacate removes the entry from the working batch
//! (it is ready to execute), and it keeps a claim on its destination. A
//! failed vacate turns the conflict into a terminal
//! [`IssueKind::OverrideFailed`] one.
//!
//! An overridden entry stays the chosen entry of its destination group.
//! Re-detection never promotes another member in its place: the vacated
//! entry still runs, so the other members keep their
//! [`IssueKind::Duplicate`] issue. Its source also still counts for
//! [`IssueKind::Overlap`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::batch::{Batch, ResolvedEntry};
use crate::error::{Error, Result};

use super::detector::ConflictDetector;
use super::{Conflict, IssueKind};

/// Frees a destination path by discarding whatever occupies it.
///
/// Implemented for closures:
///
/// ```
/// use mvguard::conflict::Vacate;
/// use std::path::Path;
///
/// let dry_run = |path: &Path| -> mvguard::Result<()> {
///     println!("would discard {}", path.display());
///     Ok(())
/// };
/// assert!(dry_run.vacate(Path::new("/m/Y.avi")).is_ok());
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Vacate {
    /// Discard the file or directory at `path`.
    ///
    /// # Errors
    ///
    /// Any failure leaves the path in an unknown state and is reported as an
    /// override failure for the affected entry.
    fn vacate(&self, path: &Path) -> Result<()>;
}

impl<F> Vacate for F
where
    F: Fn(&Path) -> Result<()>,
{
    fn vacate(&self, path: &Path) -> Result<()> {
        self(path)
    }
}

/// Permanently deletes the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteVacate;

impl Vacate for DeleteVacate {
    fn vacate(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path).map_err(|e| vacate_failed(path, &e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| vacate_failed(path, &e))?;
        log::debug!("deleted {}", path.display());
        Ok(())
    }
}

/// Moves the destination into a trash directory.
///
/// Each discarded item gets a timestamped name so nothing in the trash is
/// ever overwritten.
///
/// # Examples
///
/// ```
/// use mvguard::conflict::{TrashVacate, Vacate};
///
/// let temp = tempfile::tempdir().unwrap();
/// let occupied = temp.path().join("Y.avi");
/// std::fs::write(&occupied, b"old").unwrap();
///
/// let trash = TrashVacate::new(temp.path().join("trash"));
/// trash.vacate(&occupied).unwrap();
///
/// assert!(!occupied.exists());
/// assert_eq!(std::fs::read_dir(trash.dir()).unwrap().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TrashVacate {
    dir: PathBuf,
}

impl TrashVacate {
    /// Trash into `dir`, created on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The trash directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target_for(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map_or_else(|| "unnamed".into(), |n| n.to_string_lossy());
        let stamp = Local::now().format("%Y%m%d-%H%M%S");

        let mut target = self.dir.join(format!("{stamp}.{name}"));
        let mut counter = 1;
        while target.exists() {
            target = self.dir.join(format!("{stamp}-{counter}.{name}"));
            counter += 1;
        }
        target
    }
}

impl Vacate for TrashVacate {
    fn vacate(&self, path: &Path) -> Result<()> {
        if fs::symlink_metadata(path).is_err() {
            return Err(Error::VacateFailed {
                path: path.to_path_buf(),
                reason: "nothing to discard".to_string(),
            });
        }
        fs::create_dir_all(&self.dir).map_err(|e| vacate_failed(path, &e))?;

        let target = self.target_for(path);
        if let Err(rename_err) = fs::rename(path, &target) {
            log::debug!(
                "rename into trash failed ({rename_err}), falling back to copy for {}",
                path.display()
            );
            copy_then_remove(path, &target).map_err(|e| vacate_failed(path, &e))?;
        }
        log::debug!("moved {} to {}", path.display(), target.display());
        Ok(())
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(from)?.is_dir() {
        copy_dir(from, to)?;
        fs::remove_dir_all(from)
    } else {
        fs::copy(from, to)?;
        fs::remove_file(from)
    }
}

fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for child in fs::read_dir(from)? {
        let child = child?;
        let target = to.join(child.file_name());
        if child.file_type()?.is_dir() {
            copy_dir(&child.path(), &target)?;
        } else {
            fs::copy(child.path(), &target)?;
        }
    }
    Ok(())
}

fn vacate_failed(path: &Path, err: &io::Error) -> Error {
    Error::VacateFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// One override step over a working batch.
#[derive(Debug, Clone)]
pub struct OverrideRequest {
    /// The current working batch.
    pub batch: Batch,
    /// Conflicts selected for override. All must be overridable.
    pub selected: Vec<Conflict>,
    /// Terminal failures from earlier steps.
    pub failed: Vec<Conflict>,
    /// Entries removed by earlier successful overrides.
    pub claims: Vec<ResolvedEntry>,
}

impl OverrideRequest {
    /// Request overriding `selected` within `batch`, with no prior history.
    #[must_use]
    pub fn new(batch: Batch, selected: Vec<Conflict>) -> Self {
        Self {
            batch,
            selected,
            failed: Vec::new(),
            claims: Vec::new(),
        }
    }

    /// Carry failures from earlier steps.
    #[must_use]
    pub fn with_failed(mut self, failed: Vec<Conflict>) -> Self {
        self.failed = failed;
        self
    }

    /// Carry claims from earlier steps.
    #[must_use]
    pub fn with_claims(mut self, claims: Vec<ResolvedEntry>) -> Self {
        self.claims = claims;
        self
    }
}

/// Result of one override step.
#[derive(Debug, Clone)]
pub struct OverrideOutcome {
    /// The working batch without the entries whose destination was vacated.
    pub batch: Batch,
    /// Entries whose destination was vacated in this step.
    pub removed: Vec<ResolvedEntry>,
    /// Every terminal failure so far, including earlier steps.
    pub failed: Vec<Conflict>,
    /// The recomputed conflict list, in batch order.
    pub remaining: Vec<Conflict>,
}

impl OverrideOutcome {
    /// Returns true if no conflicts remain and the batch can run as is.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Runs override steps against a detector.
///
/// # Examples
///
/// ```
/// use mvguard::conflict::{ConflictDetector, OverrideEngine, OverrideRequest};
/// use mvguard::fs::MockFileSystem;
/// use mvguard::Batch;
/// use std::path::Path;
///
/// let detector = ConflictDetector::new()
///     .with_filesystem(MockFileSystem::new().with_file("/m/Y.avi"));
/// let batch = Batch::from_pairs([("/m/a.avi", "Y.avi")]).unwrap();
/// let conflicts = detector.detect(&batch).unwrap();
///
/// let discard = |_: &Path| -> mvguard::Result<()> { Ok(()) };
/// let outcome = OverrideEngine::new(&detector)
///     .run(OverrideRequest::new(batch, conflicts), &discard)
///     .unwrap();
///
/// assert!(outcome.is_resolved());
/// assert!(outcome.batch.is_empty());
/// assert_eq!(outcome.removed.len(), 1);
/// ```
#[derive(Debug)]
pub struct OverrideEngine<'d> {
    detector: &'d ConflictDetector,
}

impl<'d> OverrideEngine<'d> {
    /// Create an engine that re-detects with `detector`.
    #[must_use]
    pub fn new(detector: &'d ConflictDetector) -> Self {
        Self { detector }
    }

    /// Vacate every selected destination, then recompute conflicts.
    ///
    /// A source selected more than once is vacated once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOverridable`] or [`Error::NotFound`] before any
    /// vacate runs if a selected conflict is not overridable or its source is
    /// not in the batch. Resolver failures during re-detection propagate.
    /// Vacate failures are not errors: they become terminal conflicts.
    pub fn run(&self, request: OverrideRequest, vacate: &dyn Vacate) -> Result<OverrideOutcome> {
        let OverrideRequest {
            mut batch,
            mut selected,
            mut failed,
            mut claims,
        } = request;

        // One vacate per source, however often it was selected
        let mut seen = HashSet::new();
        selected.retain(|conflict| seen.insert(conflict.source().to_path_buf()));

        for conflict in &selected {
            if !conflict.is_overridable() {
                return Err(Error::NotOverridable {
                    source_path: conflict.source().to_path_buf(),
                });
            }
            if !batch.contains(conflict.source()) {
                return Err(Error::NotFound {
                    resource: format!("batch entry {}", conflict.source().display()),
                });
            }
        }

        let mut removed = Vec::new();
        for conflict in &selected {
            match vacate.vacate(conflict.destination()) {
                Ok(()) => {
                    if let Some(entry) = batch.remove(conflict.source()) {
                        log::info!("vacated {} for {}", conflict.destination().display(), entry);
                        removed.push(ResolvedEntry::new(entry, conflict.destination().to_path_buf()));
                    }
                }
                Err(err) => {
                    let detail = match err {
                        Error::VacateFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    log::warn!(
                        "could not vacate {}: {detail}",
                        conflict.destination().display()
                    );
                    failed.push(conflict.override_failed(&detail));
                }
            }
        }

        claims.extend(removed.iter().cloned());
        let detected = self.detector.detect_with_claims(&batch, &claims)?;
        let remaining = merge_failures(&batch, detected, &failed);

        Ok(OverrideOutcome {
            batch,
            removed,
            failed,
            remaining,
        })
    }
}

/// Recomputed conflicts in batch order, with terminal failures taking the
/// place of whatever was re-detected for their source.
fn merge_failures(batch: &Batch, detected: Vec<Conflict>, failed: &[Conflict]) -> Vec<Conflict> {
    let failed: HashMap<&Path, &Conflict> = failed
        .iter()
        .filter(|c| c.has(IssueKind::OverrideFailed))
        .map(|c| (c.source(), c))
        .collect();
    let mut detected: HashMap<PathBuf, Conflict> = detected
        .into_iter()
        .map(|c| (c.source().to_path_buf(), c))
        .collect();

    batch
        .sources()
        .filter_map(|source| match failed.get(source) {
            Some(conflict) => Some((*conflict).clone()),
            None => detected.remove(source),
        })
        .collect()
}
