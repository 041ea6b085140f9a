//! Output formatter implementations.

use crate::batch::Batch;
use crate::conflict::{any_overridable, Conflict};
use crate::mapping::MappingRecord;
use crate::{Error, Result};

use super::OutputFormatter;

/// Formatter for terminal output.
///
/// Each conflict is shown as its mapping followed by one line per issue,
/// label first.
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_conflicts(&self, conflicts: &[Conflict]) -> Result<String> {
        if conflicts.is_empty() {
            return Ok("No conflicts.".to_string());
        }

        let mut lines = Vec::new();
        for conflict in conflicts {
            lines.push(format!(
                "{} \u{2794} {}",
                conflict.source().display(),
                conflict.destination().display()
            ));
            for (kind, message) in conflict.issues() {
                lines.push(format!("  {}: {message}", kind.label()));
            }
        }

        let overridable = conflicts.iter().filter(|c| c.is_overridable()).count();
        let noun = if conflicts.len() == 1 { "conflict" } else { "conflicts" };
        let mut summary = format!("{} {noun}", conflicts.len());
        if any_overridable(conflicts) {
            summary.push_str(&format!(", {overridable} can be overridden"));
        }
        lines.push(summary);

        Ok(lines.join("\n"))
    }

    fn format_batch(&self, batch: &Batch) -> Result<String> {
        Ok(batch
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Formatter for JSON output.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_conflicts(&self, conflicts: &[Conflict]) -> Result<String> {
        Ok(serde_json::to_string_pretty(conflicts)?)
    }

    fn format_batch(&self, batch: &Batch) -> Result<String> {
        let records: Vec<MappingRecord> = batch
            .iter()
            .map(|entry| MappingRecord {
                from: entry.source().to_path_buf(),
                to: entry.destination().to_path_buf(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

/// Formatter for tab-separated output.
///
/// Conflict reports carry a header row; mappings do not, so they can be
/// fed back in as TSV input.
pub struct TsvFormatter;

impl TsvFormatter {
    fn write_rows<I, R>(rows: I) -> Result<String>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .flexible(true)
            .from_writer(Vec::new());
        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Validation {
            field: "tsv_output".to_string(),
            message: format!("output is not valid UTF-8: {e}"),
        })?;
        Ok(text.trim_end_matches('\n').to_string())
    }
}

impl OutputFormatter for TsvFormatter {
    fn format_conflicts(&self, conflicts: &[Conflict]) -> Result<String> {
        let header = ["source", "destination", "issues", "overridable", "message"]
            .map(String::from)
            .to_vec();
        let rows = conflicts.iter().map(|conflict| {
            vec![
                conflict.source().to_string_lossy().into_owned(),
                conflict.destination().to_string_lossy().into_owned(),
                conflict
                    .kinds()
                    .map(|kind| kind.code())
                    .collect::<Vec<_>>()
                    .join(","),
                conflict.is_overridable().to_string(),
                conflict.primary_message().to_string(),
            ]
        });
        Self::write_rows(std::iter::once(header).chain(rows))
    }

    fn format_batch(&self, batch: &Batch) -> Result<String> {
        Self::write_rows(batch.iter().map(|entry| {
            [
                entry.source().to_string_lossy().into_owned(),
                entry.destination().to_string_lossy().into_owned(),
            ]
        }))
    }
}
