//! Issue message wording.
//!
//! Messages name files rather than full paths; the full source and
//! destination paths travel alongside in the [`Conflict`](super::Conflict).

use std::borrow::Cow;
use std::path::Path;

/// Final path component, or the whole path when there is none (`/`).
pub(crate) fn file_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
}

pub(crate) fn missing_extension(destination: &Path) -> String {
    format!(
        "Destination file path [{}] has no file extension.",
        file_name(destination)
    )
}

pub(crate) fn duplicate(
    competitors: &[&Path],
    destination: &Path,
    chosen: &Path,
    source: &Path,
) -> String {
    let names: Vec<_> = competitors.iter().map(|p| file_name(p)).collect();
    format!(
        "Multiple source files map to the same destination file [{}] \u{2794} [{}]. \
         The highest-quality file [{}] was chosen instead of [{}].",
        names.join(", "),
        file_name(destination),
        file_name(chosen),
        file_name(source)
    )
}

pub(crate) fn overlap(source: &Path, destination: &Path, next_destination: &Path) -> String {
    format!(
        "Overlapping file mapping between [{} \u{2794} {}] and [{} \u{2794} {}].",
        file_name(source),
        file_name(destination),
        file_name(destination),
        file_name(next_destination)
    )
}

pub(crate) fn file_exists(destination: &Path) -> String {
    format!(
        "Destination file path [{}] already exists.",
        file_name(destination)
    )
}

pub(crate) fn override_failed(destination: &Path, detail: &str) -> String {
    format!("Failed to vacate [{}]: {detail}", destination.display())
}
