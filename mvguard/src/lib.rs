#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # mvguard
//!
//! A library for checking batch rename mappings before they run.
//!
//! Given an ordered mapping of existing source files to intended
//! destinations, mvguard finds every entry that would collide, clobber or
//! misbehave, lets the caller vacate occupied destinations, and produces
//! the subset of the mapping that is safe to execute.
//!
//! ## Core Types
//!
//! - [`Batch`], [`RenameEntry`] and [`ResolvedEntry`]: the rename mapping
//! - [`ConflictDetector`], [`Conflict`] and [`IssueKind`]: conflict detection
//! - [`ResolutionSession`], [`Decision`] and [`Outcome`]: interactive resolution
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use mvguard::fs::MockFileSystem;
//! use mvguard::{check, Batch, ConflictDetector, Decision, IssueKind, Outcome};
//! use mvguard::session::Check;
//!
//! let batch = Batch::from_pairs([
//!     ("/media/a.avi", "Show - 1x01.avi"),
//!     ("/media/b.avi", "Show - 1x01.avi"),
//! ])
//! .unwrap();
//!
//! let detector = ConflictDetector::new().with_filesystem(MockFileSystem::new());
//! let Check::Conflicts(session) = check(&detector, batch).unwrap() else {
//!     panic!("expected a conflict");
//! };
//! assert!(session.conflicts()[0].has(IssueKind::Duplicate));
//!
//! // Continue drops the conflicting entry and keeps the rest
//! let Outcome::Execute(safe) = session.finish(Decision::Continue) else {
//!     panic!("expected a batch");
//! };
//! assert_eq!(safe.len(), 1);
//! ```

pub mod batch;
pub mod config;
pub mod conflict;
pub mod error;
pub mod fs;
pub mod logging;
pub mod mapping;
pub mod output;
pub mod path;
pub mod session;

// Re-export key types at crate root for convenience
pub use batch::{Batch, RenameEntry, ResolvedEntry};
pub use config::{Config, ConfigBuilder};
pub use conflict::{
    any_overridable, Conflict, ConflictDetector, IssueKind, QualityOrder, QualityStrategy, Vacate,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{DestinationResolver, PathResolver};
pub use session::{check, Decision, Outcome, ResolutionSession};
