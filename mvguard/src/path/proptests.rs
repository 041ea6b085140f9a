//! Property-based tests for destination resolution.

use super::resolver::{DestinationResolver, PathResolver};
use proptest::prelude::*;
use std::path::{Component, PathBuf};

fn path_component_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,20}"
}

fn source_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(path_component_strategy(), 1..6).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path.set_extension("mkv");
        path
    })
}

fn relative_destination_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(
        prop_oneof![
            Just(".".to_string()),
            Just("..".to_string()),
            path_component_strategy(),
        ],
        1..6,
    )
    .prop_map(|parts| parts.iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        max_shrink_iters: 5000,
        .. ProptestConfig::default()
    })]

    // Resolved destinations are absolute and free of `.`/`..`
    #[test]
    fn resolved_destination_is_normal(
        source in source_strategy(),
        destination in relative_destination_strategy()
    ) {
        if let Ok(resolved) = PathResolver::new().resolve(&source, &destination) {
            prop_assert!(resolved.is_absolute());
            for component in resolved.components() {
                prop_assert_ne!(component, Component::CurDir);
                prop_assert_ne!(component, Component::ParentDir);
            }
        }
    }

    // Resolution is deterministic
    #[test]
    fn resolution_is_deterministic(
        source in source_strategy(),
        destination in relative_destination_strategy()
    ) {
        let resolver = PathResolver::new();
        let first = resolver.resolve(&source, &destination).ok();
        let second = resolver.resolve(&source, &destination).ok();
        prop_assert_eq!(first, second);
    }

    // A bare file name always lands next to the source
    #[test]
    fn bare_name_is_sibling(source in source_strategy(), name in path_component_strategy()) {
        let resolved = PathResolver::new().resolve(&source, &PathBuf::from(&name)).unwrap();
        prop_assert_eq!(resolved.parent(), source.parent());
    }
}
