//! Conflict detection and resolution for rename batches.
//!
//! # Architecture
//!
//! - [`ConflictDetector`] scans a whole [`Batch`](crate::Batch) and emits one
//!   [`Conflict`] per unsafe entry, carrying every applicable [`IssueKind`].
//! - [`DuplicateResolver`] groups entries by resolved destination and uses an
//!   injected [`QualityOrder`] to pick the one entry allowed to keep it.
//! - [`OverrideEngine`] vacates the destinations of overridable conflicts and
//!   recomputes the conflict set over the shrunken batch.
//!
//! Structural problems are data, never errors: only resolver failures and
//! precondition violations surface as [`Error`](crate::Error).
//!
//! # Examples
//!
//! ```
//! use mvguard::conflict::{ConflictDetector, IssueKind};
//! use mvguard::fs::MockFileSystem;
//! use mvguard::Batch;
//!
//! let batch = Batch::from_pairs([("/m/a.avi", "/m/X.avi"), ("/m/b.avi", "/m/X.avi")]).unwrap();
//! let detector = ConflictDetector::new().with_filesystem(MockFileSystem::new());
//!
//! let conflicts = detector.detect(&batch).unwrap();
//! assert_eq!(conflicts.len(), 1);
//! assert_eq!(conflicts[0].source().to_str(), Some("/m/b.avi"));
//! assert!(conflicts[0].has(IssueKind::Duplicate));
//! assert!(!conflicts[0].is_overridable());
//! ```

pub mod detector;
pub mod duplicates;
pub mod kind;
pub(crate) mod messages;
pub mod overrides;
pub mod quality;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use detector::ConflictDetector;
pub use duplicates::{DestinationGroups, DuplicateResolver};
pub use kind::IssueKind;
pub use overrides::{
    DeleteVacate, OverrideEngine, OverrideOutcome, OverrideRequest, TrashVacate, Vacate,
};
pub use quality::{InputOrder, LargestFirst, NewestFirst, QualityOrder, QualityStrategy};

/// Why one source/destination pair is currently unsafe to execute.
///
/// A conflict always carries at least one issue, and it is overridable
/// exactly when its only issue is [`IssueKind::FileExists`].
///
/// # Examples
///
/// ```
/// use mvguard::{Conflict, IssueKind};
/// use std::collections::BTreeMap;
///
/// let issues = BTreeMap::from([(IssueKind::FileExists, "exists".to_string())]);
/// let conflict = Conflict::new("/m/a.avi", "/m/b.avi", issues).unwrap();
/// assert!(conflict.is_overridable());
///
/// assert!(Conflict::new("/m/a.avi", "/m/b.avi", BTreeMap::new()).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    source: PathBuf,
    destination: PathBuf,
    issues: BTreeMap<IssueKind, String>,
    overridable: bool,
}

impl Conflict {
    /// Build a conflict from its issues, or `None` when there are none.
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        issues: BTreeMap<IssueKind, String>,
    ) -> Option<Self> {
        if issues.is_empty() {
            return None;
        }
        let overridable = issues.len() == 1 && issues.contains_key(&IssueKind::FileExists);
        Some(Self {
            source: source.into(),
            destination: destination.into(),
            issues,
            overridable,
        })
    }

    /// Terminal conflict recorded after a failed override attempt.
    #[must_use]
    pub fn override_failed(&self, detail: &str) -> Self {
        Self {
            source: self.source.clone(),
            destination: self.destination.clone(),
            issues: BTreeMap::from([(
                IssueKind::OverrideFailed,
                messages::override_failed(&self.destination, detail),
            )]),
            overridable: false,
        }
    }

    /// Source path of the affected entry.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Resolved destination path of the affected entry.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Issue messages keyed by kind, in report order.
    #[must_use]
    pub fn issues(&self) -> &BTreeMap<IssueKind, String> {
        &self.issues
    }

    /// Returns true if the conflict carries `kind`.
    #[must_use]
    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.contains_key(&kind)
    }

    /// Kinds carried by this conflict, in report order.
    pub fn kinds(&self) -> impl Iterator<Item = IssueKind> + '_ {
        self.issues.keys().copied()
    }

    /// Returns true if vacating the destination would resolve this conflict.
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// The message a one-line summary shows: the first issue in report order.
    #[must_use]
    pub fn primary_message(&self) -> &str {
        self.issues.values().next().map_or("", String::as_str)
    }
}

/// Returns true if at least one conflict can be overridden.
///
/// This is the enable/disable state of an "override" action in a UI.
#[must_use]
pub fn any_overridable(conflicts: &[Conflict]) -> bool {
    conflicts.iter().any(Conflict::is_overridable)
}
