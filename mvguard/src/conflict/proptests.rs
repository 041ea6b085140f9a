//! Property-based tests for conflict detection.
//!
//! Batches are drawn from a small name pool so duplicates, overlaps and
//! existing destinations show up often.

use super::{Conflict, ConflictDetector, IssueKind};
use crate::fs::MockFileSystem;
use crate::Batch;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn destination_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(NAMES.to_vec()), any::<bool>()).prop_map(|(name, ext)| {
        if ext {
            format!("{name}.avi")
        } else {
            name.to_string()
        }
    })
}

fn batch_strategy() -> impl Strategy<Value = Batch> {
    prop::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len())
        .prop_flat_map(|sources| {
            let len = sources.len();
            (Just(sources), prop::collection::vec(destination_strategy(), len))
        })
        .prop_map(|(sources, destinations)| {
            Batch::from_pairs(
                sources
                    .iter()
                    .map(|s| format!("/m/{s}.avi"))
                    .zip(destinations),
            )
            .unwrap()
        })
}

fn filesystem_strategy() -> impl Strategy<Value = MockFileSystem> {
    prop::collection::vec(destination_strategy(), 0..4).prop_map(|existing| {
        let mut fs = MockFileSystem::new();
        for name in NAMES {
            fs = fs.with_file(format!("/m/{name}.avi"));
        }
        for name in existing {
            fs = fs.with_file(format!("/m/{name}"));
        }
        fs
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 2000,
        .. ProptestConfig::default()
    })]

    // Each source is reported at most once
    #[test]
    fn sources_reported_once(batch in batch_strategy(), fs in filesystem_strategy()) {
        let conflicts = ConflictDetector::new().with_filesystem(fs).detect(&batch).unwrap();
        let unique: HashSet<&Path> = conflicts.iter().map(Conflict::source).collect();
        prop_assert_eq!(unique.len(), conflicts.len());
        prop_assert!(conflicts.iter().all(|c| batch.contains(c.source())));
    }

    // Overridable exactly when the only issue is an existing destination
    #[test]
    fn overridable_iff_only_file_exists(batch in batch_strategy(), fs in filesystem_strategy()) {
        let conflicts = ConflictDetector::new().with_filesystem(fs).detect(&batch).unwrap();
        for conflict in &conflicts {
            let only_exists = conflict.kinds().collect::<Vec<_>>() == vec![IssueKind::FileExists];
            prop_assert_eq!(conflict.is_overridable(), only_exists);
        }
    }

    // Exactly one member of each contested destination escapes DUPLICATE
    #[test]
    fn one_winner_per_destination(batch in batch_strategy(), fs in filesystem_strategy()) {
        let detector = ConflictDetector::new().with_filesystem(fs);
        let conflicts = detector.detect(&batch).unwrap();
        let duplicates: HashSet<&Path> = conflicts
            .iter()
            .filter(|c| c.has(IssueKind::Duplicate))
            .map(Conflict::source)
            .collect();

        let mut groups: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
        for entry in detector.resolve_all(&batch).unwrap() {
            groups
                .entry(entry.resolved().to_path_buf())
                .or_default()
                .push(entry.source().to_path_buf());
        }

        for members in groups.values() {
            let winners: Vec<&PathBuf> = members
                .iter()
                .filter(|s| !duplicates.contains(s.as_path()))
                .collect();
            prop_assert_eq!(winners.len(), 1);
            // Input order ranks everyone equal, so the first listed wins.
            prop_assert_eq!(winners[0], &members[0]);
        }
    }

    // Detection is a pure function of batch and filesystem state
    #[test]
    fn detection_is_deterministic(batch in batch_strategy(), fs in filesystem_strategy()) {
        let detector = ConflictDetector::new().with_filesystem(fs);
        prop_assert_eq!(detector.detect(&batch).unwrap(), detector.detect(&batch).unwrap());
    }
}
