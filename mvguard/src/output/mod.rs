//! Output formatting for conflict reports and executable mappings.
//!
//! Every formatter renders two things: the conflict report (one record per
//! conflict with `source`, `destination`, `issues` and `overridable`) and
//! the mapping that is safe to execute. The JSON and TSV renderings of a
//! mapping can be read back by [`mapping::load`](crate::mapping::load).

mod formatters;

use crate::batch::Batch;
use crate::config::OutputFormat;
use crate::conflict::Conflict;
use crate::Result;

pub use formatters::{HumanFormatter, JsonFormatter, TsvFormatter};

/// Trait for rendering conflicts and mappings.
pub trait OutputFormatter {
    /// Render a conflict report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_conflicts(&self, conflicts: &[Conflict]) -> Result<String>;

    /// Render an executable mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_batch(&self, batch: &Batch) -> Result<String>;
}

impl OutputFormat {
    /// Create a formatter for this output format.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvguard::config::OutputFormat;
    ///
    /// let formatter = OutputFormat::Json.create_formatter();
    /// assert_eq!(formatter.format_conflicts(&[]).unwrap(), "[]");
    /// ```
    #[must_use]
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter),
            Self::Json => Box::new(JsonFormatter),
            Self::Tsv => Box::new(TsvFormatter),
        }
    }
}
