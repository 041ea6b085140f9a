//! Final filtering of a batch down to its executable subset.

use std::path::Path;

use crate::conflict::Conflict;

use super::Batch;

/// Drop every entry that still has an unresolved conflict.
///
/// The result is always a subset of `original` with order and destinations
/// unchanged. With no conflicts it equals `original`.
///
/// # Examples
///
/// ```
/// use mvguard::batch::exclude;
/// use mvguard::Batch;
///
/// let batch = Batch::from_pairs([("/m/a.avi", "A.avi")]).unwrap();
/// assert_eq!(exclude(&batch, &[]), batch);
/// ```
#[must_use]
pub fn exclude(original: &Batch, unresolved: &[Conflict]) -> Batch {
    exclude_sources(original, unresolved.iter().map(Conflict::source))
}

/// Drop the entries keyed by `sources`. Unknown sources are ignored.
#[must_use]
pub fn exclude_sources<'a, I>(original: &Batch, sources: I) -> Batch
where
    I: IntoIterator<Item = &'a Path>,
{
    let filtered = original.without(sources);
    if filtered.len() != original.len() {
        log::debug!(
            "excluded {} of {} entries from the batch",
            original.len() - filtered.len(),
            original.len()
        );
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{Conflict, IssueKind};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn conflict_for(source: &str) -> Conflict {
        let issues = BTreeMap::from([(IssueKind::Overlap, "overlap".to_string())]);
        Conflict::new(source, "/m/x.avi", issues).unwrap()
    }

    #[test]
    fn test_exclude_empty_is_identity() {
        let batch = Batch::from_pairs([("/m/a.avi", "A.avi"), ("/m/b.avi", "B.avi")]).unwrap();
        assert_eq!(exclude(&batch, &[]), batch);
    }

    #[test]
    fn test_exclude_removes_conflicting_sources() {
        let batch = Batch::from_pairs([
            ("/m/a.avi", "A.avi"),
            ("/m/b.avi", "B.avi"),
            ("/m/c.avi", "C.avi"),
        ])
        .unwrap();

        let filtered = exclude(&batch, &[conflict_for("/m/b.avi")]);
        let sources: Vec<PathBuf> = filtered.sources().map(Path::to_path_buf).collect();
        assert_eq!(
            sources,
            vec![PathBuf::from("/m/a.avi"), PathBuf::from("/m/c.avi")]
        );
        assert_eq!(
            filtered.get(Path::new("/m/c.avi")).unwrap().destination(),
            Path::new("C.avi")
        );
    }

    #[test]
    fn test_exclude_ignores_unknown_sources() {
        let batch = Batch::from_pairs([("/m/a.avi", "A.avi")]).unwrap();
        let filtered = exclude(&batch, &[conflict_for("/elsewhere/z.avi")]);
        assert_eq!(filtered, batch);
    }
}
