//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{Config, ConflictPolicy, OutputFormat, VacateMode};
use crate::conflict::QualityStrategy;
use proptest::prelude::*;
use std::path::PathBuf;

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(prop_oneof![
            Just(QualityStrategy::Input),
            Just(QualityStrategy::Largest),
            Just(QualityStrategy::Newest),
        ]),
        prop::option::of(prop_oneof![
            Just(ConflictPolicy::Exclude),
            Just(ConflictPolicy::Abort),
        ]),
        prop::option::of(any::<bool>()),
        prop::option::of(prop_oneof![Just(VacateMode::Trash), Just(VacateMode::Delete)]),
        prop::option::of("/[a-z]{1,10}/[a-z]{1,10}".prop_map(PathBuf::from)),
        prop::option::of(prop_oneof![
            Just(OutputFormat::Human),
            Just(OutputFormat::Json),
            Just(OutputFormat::Tsv),
        ]),
    )
        .prop_map(
            |(quality_order, on_conflict, override_existing, vacate, trash_dir, output_format)| {
                Config {
                    quality_order,
                    on_conflict,
                    override_existing,
                    vacate,
                    trash_dir,
                    output_format,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        max_shrink_iters: 5000,
        .. ProptestConfig::default()
    })]

    // Fields set in the higher source win, unset ones fall through
    #[test]
    fn higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(merged.quality_order, high.quality_order.or(low.quality_order));
        prop_assert_eq!(merged.on_conflict, high.on_conflict.or(low.on_conflict));
        prop_assert_eq!(merged.override_existing, high.override_existing.or(low.override_existing));
        prop_assert_eq!(merged.vacate, high.vacate.or(low.vacate));
        prop_assert_eq!(merged.trash_dir, high.trash_dir.clone().or(low.trash_dir.clone()));
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));
    }

    // Merging an empty config changes nothing
    #[test]
    fn empty_merge_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Merging is idempotent
    #[test]
    fn merge_is_idempotent(base in config_strategy(), source in config_strategy()) {
        let mut once = base.clone();
        ConfigMerger::merge_into(&mut once, &source);
        let mut twice = once.clone();
        ConfigMerger::merge_into(&mut twice, &source);
        prop_assert_eq!(once, twice);
    }

    // YAML serialization preserves every field
    #[test]
    fn yaml_preserves_config(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
