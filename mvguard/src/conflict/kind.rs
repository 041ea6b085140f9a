//! Issue kinds and their fixed labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a rename entry is unsafe to execute.
///
/// The declaration order is the order issues are listed in reports.
///
/// # Examples
///
/// ```
/// use mvguard::IssueKind;
///
/// assert_eq!(IssueKind::FileExists.label(), "Destination file already exists");
/// assert_eq!(IssueKind::Overlap.to_string(), "Duplicate source path");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Vacating the destination during an override failed.
    OverrideFailed,
    /// The destination already exists on disk.
    FileExists,
    /// The destination of a plain file has no extension.
    MissingExtension,
    /// Another, preferred source maps to the same destination.
    Duplicate,
    /// The destination is another entry's source path.
    Overlap,
}

impl IssueKind {
    /// All kinds in report order.
    pub const ALL: [Self; 5] = [
        Self::OverrideFailed,
        Self::FileExists,
        Self::MissingExtension,
        Self::Duplicate,
        Self::Overlap,
    ];

    /// Fixed human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OverrideFailed => "Failed to override destination file",
            Self::FileExists => "Destination file already exists",
            Self::MissingExtension => "Missing file extension",
            Self::Duplicate => "Duplicate destination path",
            Self::Overlap => "Duplicate source path",
        }
    }

    /// Wire name, as used in JSON reports.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::OverrideFailed => "OVERRIDE_FAILED",
            Self::FileExists => "FILE_EXISTS",
            Self::MissingExtension => "MISSING_EXTENSION",
            Self::Duplicate => "DUPLICATE",
            Self::Overlap => "OVERLAP",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
