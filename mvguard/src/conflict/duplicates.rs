//! Grouping of entries by destination and selection of the one entry per
//! group that keeps it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::batch::ResolvedEntry;

use super::quality::QualityOrder;

/// Entries grouped by resolved destination, each group ordered best first.
#[derive(Debug, Clone, Default)]
pub struct DestinationGroups {
    groups: HashMap<PathBuf, Vec<ResolvedEntry>>,
}

impl DestinationGroups {
    /// Members competing for `destination`, best first. Empty if none.
    #[must_use]
    pub fn members(&self, destination: &Path) -> &[ResolvedEntry] {
        self.groups
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The entry that keeps `destination`.
    #[must_use]
    pub fn chosen(&self, destination: &Path) -> Option<&ResolvedEntry> {
        self.members(destination).first()
    }

    /// Returns true if more than one entry targets `destination`.
    #[must_use]
    pub fn is_contested(&self, destination: &Path) -> bool {
        self.members(destination).len() > 1
    }

    /// Number of distinct destinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the contested destinations and their members.
    pub fn contested(&self) -> impl Iterator<Item = (&Path, &[ResolvedEntry])> {
        self.groups
            .iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(dest, members)| (dest.as_path(), members.as_slice()))
    }
}

/// Picks the winner among entries that share a destination.
///
/// # Examples
///
/// ```
/// use mvguard::conflict::{DuplicateResolver, InputOrder};
/// use mvguard::{RenameEntry, ResolvedEntry};
/// use std::path::{Path, PathBuf};
///
/// let entries = vec![
///     ResolvedEntry::new(RenameEntry::new("/m/a.avi", "X.avi"), PathBuf::from("/m/X.avi")),
///     ResolvedEntry::new(RenameEntry::new("/m/b.avi", "X.avi"), PathBuf::from("/m/X.avi")),
/// ];
///
/// let resolver = DuplicateResolver::new(&InputOrder);
/// let groups = resolver.group_by_destination(&entries);
///
/// let chosen = groups.chosen(Path::new("/m/X.avi")).unwrap();
/// assert_eq!(chosen.source(), Path::new("/m/a.avi"));
/// ```
pub struct DuplicateResolver<'a> {
    order: &'a dyn QualityOrder,
    claims: &'a [ResolvedEntry],
}

impl<'a> DuplicateResolver<'a> {
    /// Create a resolver ranking candidates with `order`.
    #[must_use]
    pub fn new(order: &'a dyn QualityOrder) -> Self {
        Self { order, claims: &[] }
    }

    /// Entries that already hold their destination.
    ///
    /// A claimed entry sorts ahead of every other member of its group
    /// regardless of quality, so it stays the chosen one.
    #[must_use]
    pub fn with_claims(mut self, claims: &'a [ResolvedEntry]) -> Self {
        self.claims = claims;
        self
    }

    /// Group `entries` (plus any claims) by resolved destination.
    ///
    /// Members keep batch order before sorting, and the sort is stable.
    #[must_use]
    pub fn group_by_destination(&self, entries: &[ResolvedEntry]) -> DestinationGroups {
        let mut groups: HashMap<PathBuf, Vec<ResolvedEntry>> = HashMap::new();
        for entry in self.claims.iter().chain(entries) {
            groups
                .entry(entry.resolved().to_path_buf())
                .or_default()
                .push(entry.clone());
        }

        for members in groups.values_mut().filter(|m| m.len() > 1) {
            members.sort_by(|a, b| self.rank(a, b));
        }

        log::debug!(
            "grouped {} entries into {} destinations",
            entries.len(),
            groups.len()
        );
        DestinationGroups { groups }
    }

    fn is_claimed(&self, entry: &ResolvedEntry) -> bool {
        self.claims.iter().any(|c| c.source() == entry.source())
    }

    /// Claimed first, then by quality.
    fn rank(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering {
        self.is_claimed(b)
            .cmp(&self.is_claimed(a))
            .then_with(|| self.order.compare(a, b))
    }

    /// Best entry of `group`, the first one on ties.
    ///
    /// Claimed entries win over unclaimed ones, as in
    /// [`group_by_destination`](Self::group_by_destination).
    #[must_use]
    pub fn choose<'e>(&self, group: &'e [ResolvedEntry]) -> Option<&'e ResolvedEntry> {
        group
            .iter()
            .reduce(|best, candidate| {
                if self.rank(candidate, best).is_lt() {
                    candidate
                } else {
                    best
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RenameEntry;
    use crate::conflict::quality::InputOrder;

    fn entry(source: &str, dest: &str) -> ResolvedEntry {
        ResolvedEntry::new(RenameEntry::new(source, dest), PathBuf::from(dest))
    }

    #[test]
    fn test_single_member_groups_are_uncontested() {
        let entries = vec![entry("/m/a.avi", "/m/A.avi"), entry("/m/b.avi", "/m/B.avi")];
        let groups = DuplicateResolver::new(&InputOrder).group_by_destination(&entries);

        assert_eq!(groups.len(), 2);
        assert!(!groups.is_contested(Path::new("/m/A.avi")));
        assert_eq!(groups.contested().count(), 0);
    }

    #[test]
    fn test_quality_order_picks_chosen() {
        let prefer_b = |a: &ResolvedEntry, b: &ResolvedEntry| {
            let is_b = |e: &ResolvedEntry| e.source() == Path::new("/m/b.avi");
            is_b(b).cmp(&is_b(a))
        };
        let entries = vec![
            entry("/m/a.avi", "/m/X.avi"),
            entry("/m/b.avi", "/m/X.avi"),
            entry("/m/c.avi", "/m/X.avi"),
        ];

        let resolver = DuplicateResolver::new(&prefer_b);
        let groups = resolver.group_by_destination(&entries);
        let members = groups.members(Path::new("/m/X.avi"));

        assert_eq!(members[0].source(), Path::new("/m/b.avi"));
        // Remaining members keep batch order.
        assert_eq!(members[1].source(), Path::new("/m/a.avi"));
        assert_eq!(members[2].source(), Path::new("/m/c.avi"));
        assert_eq!(
            resolver.choose(&entries).map(ResolvedEntry::source),
            Some(Path::new("/m/b.avi"))
        );
    }

    #[test]
    fn test_ties_fall_back_to_batch_order() {
        let entries = vec![entry("/m/z.avi", "/m/X.avi"), entry("/m/a.avi", "/m/X.avi")];
        let resolver = DuplicateResolver::new(&InputOrder);
        let groups = resolver.group_by_destination(&entries);

        assert_eq!(
            groups.chosen(Path::new("/m/X.avi")).unwrap().source(),
            Path::new("/m/z.avi")
        );
        assert_eq!(
            resolver.choose(&entries).unwrap().source(),
            Path::new("/m/z.avi")
        );
    }

    #[test]
    fn test_claims_are_pinned_first() {
        let prefer_pending = |a: &ResolvedEntry, b: &ResolvedEntry| {
            if a.source() == Path::new("/m/b.avi") {
                Ordering::Less
            } else if b.source() == Path::new("/m/b.avi") {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        };
        let claims = vec![entry("/m/a.avi", "/m/X.avi")];
        let pending = vec![entry("/m/b.avi", "/m/X.avi")];

        let resolver = DuplicateResolver::new(&prefer_pending).with_claims(&claims);
        let groups = resolver.group_by_destination(&pending);

        assert_eq!(
            groups.chosen(Path::new("/m/X.avi")).unwrap().source(),
            Path::new("/m/a.avi")
        );
        assert_eq!(groups.members(Path::new("/m/X.avi")).len(), 2);

        // choose agrees with the grouping
        let everyone = vec![pending[0].clone(), claims[0].clone()];
        assert_eq!(
            resolver.choose(&everyone).map(ResolvedEntry::source),
            Some(Path::new("/m/a.avi"))
        );
    }

    #[test]
    fn test_choose_empty_group() {
        assert!(DuplicateResolver::new(&InputOrder).choose(&[]).is_none());
    }

    #[test]
    fn test_unknown_destination_has_no_members() {
        let groups = DuplicateResolver::new(&InputOrder).group_by_destination(&[]);
        assert!(groups.is_empty());
        assert!(groups.members(Path::new("/nowhere")).is_empty());
        assert!(groups.chosen(Path::new("/nowhere")).is_none());
    }
}
