//! The resolution workflow: detect, optionally override, then continue or
//! cancel.
//!
//! A [`ResolutionSession`] owns one batch for the duration of one workflow
//! run. Conflicts are recomputed after every override step; the caller reads
//! the current snapshot through [`ResolutionSession::conflicts`] and finally
//! decides with [`Decision::Continue`] or [`Decision::Cancel`].
//!
//! Vacate operations that already ran are not undone when a session is
//! cancelled.
//!
//! # Examples
//!
//! ```
//! use mvguard::conflict::ConflictDetector;
//! use mvguard::fs::MockFileSystem;
//! use mvguard::session::{Decision, Outcome, ResolutionSession};
//! use mvguard::Batch;
//! use std::path::Path;
//!
//! let detector = ConflictDetector::new()
//!     .with_filesystem(MockFileSystem::new().with_file("/m/Y.avi"));
//! let batch = Batch::from_pairs([("/m/a.avi", "Y.avi"), ("/m/b.avi", "B.avi")]).unwrap();
//!
//! let mut session = ResolutionSession::start(&detector, batch.clone()).unwrap();
//! assert!(session.can_override());
//!
//! let discard = |_: &Path| -> mvguard::Result<()> { Ok(()) };
//! session.override_all(&discard).unwrap();
//! assert!(session.is_resolved());
//!
//! // Overridden entries are executed too: their destination is free now.
//! assert_eq!(session.finish(Decision::Continue), Outcome::Execute(batch));
//! ```

use std::path::PathBuf;

use crate::batch::{self, Batch, RenameEntry, ResolvedEntry};
use crate::conflict::{
    any_overridable, Conflict, ConflictDetector, OverrideEngine, OverrideRequest, Vacate,
};
use crate::error::{Error, Result};

/// What the user decided once conflicts were shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Execute everything that is safe and skip the rest.
    Continue,
    /// Abort the whole batch.
    Cancel,
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Run exactly these renames.
    Execute(Batch),
    /// Run nothing.
    Abort,
}

/// Result of a one-shot [`check`].
#[derive(Debug)]
pub enum Check<'d> {
    /// No conflicts: the batch can run unchanged.
    Clear(Batch),
    /// Conflicts need a decision.
    Conflicts(ResolutionSession<'d>),
}

/// Detect conflicts once and skip the interactive step when there are none.
///
/// # Errors
///
/// Propagates detection failures (see [`ResolutionSession::start`]).
pub fn check(detector: &ConflictDetector, batch: Batch) -> Result<Check<'_>> {
    let session = ResolutionSession::start(detector, batch)?;
    if session.is_resolved() && session.unresolvable().is_empty() {
        return Ok(Check::Clear(session.original));
    }
    Ok(Check::Conflicts(session))
}

/// Workflow state for one batch.
#[derive(Debug)]
pub struct ResolutionSession<'d> {
    detector: &'d ConflictDetector,
    original: Batch,
    working: Batch,
    conflicts: Vec<Conflict>,
    failed: Vec<Conflict>,
    claims: Vec<ResolvedEntry>,
    unresolvable: Vec<(RenameEntry, Error)>,
}

impl<'d> ResolutionSession<'d> {
    /// Start a session and run the initial detection.
    ///
    /// Entries whose destination cannot be resolved are dropped for the rest
    /// of the session and listed by [`unresolvable`](Self::unresolvable).
    ///
    /// # Errors
    ///
    /// Fails only if detection fails on the resolvable remainder.
    pub fn start(detector: &'d ConflictDetector, batch: Batch) -> Result<Self> {
        let mut unresolvable = Vec::new();
        for entry in &batch {
            if let Err(err) = detector.resolve_entry(entry) {
                log::warn!("skipping {entry}: {err}");
                unresolvable.push((entry.clone(), err));
            }
        }
        let working = batch.without(unresolvable.iter().map(|(entry, _)| entry.source()));
        let conflicts = detector.detect(&working)?;
        log::debug!(
            "session started with {} entries, {} conflicts, {} unresolvable",
            batch.len(),
            conflicts.len(),
            unresolvable.len()
        );

        Ok(Self {
            detector,
            original: batch,
            working,
            conflicts,
            failed: Vec::new(),
            claims: Vec::new(),
            unresolvable,
        })
    }

    /// Current conflicts, in batch order.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Returns true if at least one current conflict can be overridden.
    #[must_use]
    pub fn can_override(&self) -> bool {
        any_overridable(&self.conflicts)
    }

    /// Returns true if no conflicts remain.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Entries whose destinations were vacated so far.
    #[must_use]
    pub fn cleared(&self) -> &[ResolvedEntry] {
        &self.claims
    }

    /// Entries dropped because their destination could not be resolved.
    #[must_use]
    pub fn unresolvable(&self) -> &[(RenameEntry, Error)] {
        &self.unresolvable
    }

    /// The batch the session was started with.
    #[must_use]
    pub fn original(&self) -> &Batch {
        &self.original
    }

    /// Override the current conflicts of `sources`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a source has no current conflict and
    /// [`Error::NotOverridable`] if its conflict cannot be overridden. The
    /// session is unchanged on error.
    pub fn override_selected(
        &mut self,
        sources: &[PathBuf],
        vacate: &dyn Vacate,
    ) -> Result<&[Conflict]> {
        let selected = sources
            .iter()
            .map(|source| {
                self.conflicts
                    .iter()
                    .find(|c| c.source() == source)
                    .cloned()
                    .ok_or_else(|| Error::NotFound {
                        resource: format!("conflict for {}", source.display()),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.apply(selected, vacate)
    }

    /// Override every currently overridable conflict.
    ///
    /// # Errors
    ///
    /// Propagates re-detection failures.
    pub fn override_all(&mut self, vacate: &dyn Vacate) -> Result<&[Conflict]> {
        let selected: Vec<Conflict> = self
            .conflicts
            .iter()
            .filter(|c| c.is_overridable())
            .cloned()
            .collect();
        if selected.is_empty() {
            return Ok(&self.conflicts);
        }
        self.apply(selected, vacate)
    }

    fn apply(&mut self, selected: Vec<Conflict>, vacate: &dyn Vacate) -> Result<&[Conflict]> {
        let request = OverrideRequest::new(self.working.clone(), selected)
            .with_failed(self.failed.clone())
            .with_claims(self.claims.clone());
        let outcome = OverrideEngine::new(self.detector).run(request, vacate)?;

        self.working = outcome.batch;
        self.claims.extend(outcome.removed);
        self.failed = outcome.failed;
        self.conflicts = outcome.remaining;

        if self.is_resolved() {
            log::info!("all conflicts resolved");
        }
        Ok(&self.conflicts)
    }

    /// End the session.
    ///
    /// `Continue` yields the original batch minus every entry that still has
    /// a conflict or could not be resolved; `Cancel` aborts everything.
    #[must_use]
    pub fn finish(self, decision: Decision) -> Outcome {
        match decision {
            Decision::Cancel => {
                log::info!("rename batch cancelled");
                Outcome::Abort
            }
            Decision::Continue => {
                let executable = batch::exclude(&self.original, &self.conflicts);
                let executable = batch::exclude_sources(
                    &executable,
                    self.unresolvable.iter().map(|(entry, _)| entry.source()),
                );
                Outcome::Execute(executable)
            }
        }
    }
}
