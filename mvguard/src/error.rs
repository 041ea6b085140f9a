//! Error types for the mvguard library.
//!
//! Structural rename problems (duplicates, overlaps, existing files) are not
//! errors: they are reported as [`Conflict`](crate::conflict::Conflict) data.
//! This module covers the failures that do propagate to the caller, using
//! `thiserror` for the hierarchy.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with an mvguard error.
///
/// # Examples
///
/// ```
/// use mvguard::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the mvguard library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tab-separated input or output failed.
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// Two entries of one batch share the same source path.
    #[error("duplicate source path in batch: {}", path.display())]
    DuplicateSource {
        /// The repeated source path.
        path: PathBuf,
    },

    /// The destination of an entry could not be resolved to an absolute path.
    #[error("cannot resolve destination for {}: {reason}", source_path.display())]
    UnresolvableDestination {
        /// Source path of the affected entry.
        source_path: PathBuf,
        /// Why resolution failed.
        reason: String,
    },

    /// Discarding the file at a destination path failed.
    #[error("failed to vacate {}: {reason}", path.display())]
    VacateFailed {
        /// The destination path that could not be vacated.
        path: PathBuf,
        /// The underlying failure.
        reason: String,
    },

    /// An override was requested for a conflict that does not allow it.
    #[error("conflict for {} is not overridable", source_path.display())]
    NotOverridable {
        /// Source path of the offending conflict.
        source_path: PathBuf,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A rename mapping file is malformed.
    #[error("invalid mapping at line {line}: {reason}")]
    MappingFormat {
        /// One-based line number of the offending record.
        line: usize,
        /// What is wrong with the record.
        reason: String,
    },
}

impl Error {
    /// Check if error is an unresolvable destination.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvguard::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::UnresolvableDestination {
    ///     source_path: PathBuf::from("/media/a.mkv"),
    ///     reason: "escapes root".to_string(),
    /// };
    /// assert!(err.is_unresolvable());
    /// ```
    #[must_use]
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::UnresolvableDestination { .. })
    }

    /// Check if error is a caller precondition violation.
    #[must_use]
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Self::NotOverridable { .. } | Self::NotFound { .. })
    }
}
