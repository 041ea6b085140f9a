//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered; the
//! [`ConfigBuilder`](super::ConfigBuilder) starts from
//! [`Config::with_defaults`] and merges each source on top.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conflict::QualityStrategy;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use mvguard::config::{Config, ConflictPolicy};
///
/// let config: Config = serde_yaml::from_str("on_conflict: abort\n").unwrap();
/// assert_eq!(config.on_conflict, Some(ConflictPolicy::Abort));
/// assert!(serde_yaml::from_str::<Config>("colour: blue\n").is_err());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How competing sources for one destination are ranked.
    pub quality_order: Option<QualityStrategy>,

    /// What happens to entries whose conflicts remain unresolved.
    pub on_conflict: Option<ConflictPolicy>,

    /// Vacate occupied destinations automatically.
    pub override_existing: Option<bool>,

    /// How occupied destinations are vacated.
    pub vacate: Option<VacateMode>,

    /// Where trashed files go.
    pub trash_dir: Option<PathBuf>,

    /// Report format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Built-in defaults for every field except `trash_dir`, which is
    /// derived from the data directory when unset.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            quality_order: Some(QualityStrategy::default()),
            on_conflict: Some(ConflictPolicy::default()),
            override_existing: Some(false),
            vacate: Some(VacateMode::default()),
            trash_dir: None,
            output_format: Some(OutputFormat::default()),
        }
    }
}

/// What to do with unresolved conflicts at the end of a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Skip conflicting entries and run the rest.
    #[default]
    Exclude,
    /// Run nothing.
    Abort,
}

/// How an occupied destination is discarded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VacateMode {
    /// Move into the trash directory.
    #[default]
    Trash,
    /// Delete permanently.
    Delete,
}

/// Output format for reports and executable mappings.
///
/// # Examples
///
/// ```
/// use mvguard::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// JSON.
    Json,
    /// Tab-separated values.
    Tsv,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude => write!(f, "exclude"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

impl fmt::Display for VacateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trash => write!(f, "trash"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown conflict policy '{other}' (expected exclude or abort)")),
        }
    }
}

impl FromStr for VacateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trash" => Ok(Self::Trash),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown vacate mode '{other}' (expected trash or delete)")),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "tsv" => Ok(Self::Tsv),
            other => Err(format!(
                "unknown output format '{other}' (expected human, json or tsv)"
            )),
        }
    }
}
