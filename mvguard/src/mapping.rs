//! Reading rename mappings from files.
//!
//! Three formats are accepted:
//!
//! - YAML or JSON: a sequence of `{from, to}` records
//! - TSV: one `from<TAB>to` pair per line, `#` starts a comment line
//!
//! Sources are made absolute against the current directory; destinations
//! are kept exactly as written since they may be relative to their source.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::batch::{Batch, RenameEntry};
use crate::error::{Error, Result};
use crate::path::normalize;

/// One record of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingRecord {
    /// Existing source path.
    pub from: PathBuf,
    /// Destination, possibly relative to the source's directory.
    pub to: PathBuf,
}

/// Mapping file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// YAML sequence of records.
    Yaml,
    /// JSON array of records.
    Json,
    /// Tab-separated pairs.
    Tsv,
}

impl InputFormat {
    /// Guess the format from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvguard::mapping::InputFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(InputFormat::from_path(Path::new("renames.yml")), Some(InputFormat::Yaml));
    /// assert_eq!(InputFormat::from_path(Path::new("renames.tsv")), Some(InputFormat::Tsv));
    /// assert_eq!(InputFormat::from_path(Path::new("renames")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "tsv" | "txt" => Some(Self::Tsv),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "tsv" => Ok(Self::Tsv),
            other => Err(format!("unknown mapping format '{other}' (expected yaml, json or tsv)")),
        }
    }
}

/// Parse mapping records from `input`.
///
/// # Errors
///
/// Returns a parse error for malformed input and
/// [`Error::MappingFormat`] for records with an empty path or the wrong
/// number of fields.
///
/// # Examples
///
/// ```
/// use mvguard::mapping::{parse, InputFormat};
///
/// let records = parse("/m/a.avi\tShow - 1x01.avi\n", InputFormat::Tsv).unwrap();
/// assert_eq!(records[0].to.to_str(), Some("Show - 1x01.avi"));
/// ```
pub fn parse(input: &str, format: InputFormat) -> Result<Vec<MappingRecord>> {
    let records: Vec<MappingRecord> = match format {
        InputFormat::Yaml if input.trim().is_empty() => Vec::new(),
        InputFormat::Yaml => serde_yaml::from_str(input)?,
        InputFormat::Json => serde_json::from_str(input)?,
        InputFormat::Tsv => return parse_tsv(input),
    };

    for (index, record) in records.iter().enumerate() {
        check_record(index + 1, record)?;
    }
    Ok(records)
}

fn parse_tsv(input: &str) -> Result<Vec<MappingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(input.as_bytes());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row
            .position()
            .map_or(records.len() + 1, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));
        if row.len() != 2 {
            return Err(Error::MappingFormat {
                line,
                reason: format!("expected 2 tab-separated fields, found {}", row.len()),
            });
        }

        let record = MappingRecord {
            from: PathBuf::from(&row[0]),
            to: PathBuf::from(&row[1]),
        };
        check_record(line, &record)?;
        records.push(record);
    }
    Ok(records)
}

fn check_record(line: usize, record: &MappingRecord) -> Result<()> {
    if record.from.as_os_str().is_empty() {
        return Err(Error::MappingFormat {
            line,
            reason: "source path is empty".to_string(),
        });
    }
    if record.to.as_os_str().is_empty() {
        return Err(Error::MappingFormat {
            line,
            reason: "destination is empty".to_string(),
        });
    }
    Ok(())
}

/// Build a batch from records, making each source absolute.
///
/// # Errors
///
/// Returns an error if a source cannot be normalized or appears twice.
pub fn to_batch(records: Vec<MappingRecord>) -> Result<Batch> {
    let mut batch = Batch::new();
    for record in records {
        let source = normalize(&record.from)?;
        batch.insert(RenameEntry::new(source, record.to))?;
    }
    Ok(batch)
}

/// Read a mapping file into a batch.
///
/// The format is taken from `format`, or else guessed from the extension.
/// Files with an unknown extension are read as TSV.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// records do not form a valid batch.
pub fn load(path: &Path, format: Option<InputFormat>) -> Result<Batch> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .unwrap_or(InputFormat::Tsv);
    let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read mapping file: {e}"),
    })?;

    let records = parse(&contents, format)?;
    log::debug!(
        "read {} {format} records from {}",
        records.len(),
        path.display()
    );
    to_batch(records)
}
