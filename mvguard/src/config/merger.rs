//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use mvguard::config::{Config, ConfigMerger, VacateMode};
///
/// let low = Config { vacate: Some(VacateMode::Trash), ..Default::default() };
/// let high = Config { vacate: Some(VacateMode::Delete), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.vacate, Some(VacateMode::Delete));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given from lowest to highest precedence, onto `base`.
    #[must_use]
    pub fn merge(base: Config, sources: Vec<ConfigSource>) -> Config {
        let mut result = base;
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target. Every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.quality_order.is_some() {
            target.quality_order = source.quality_order;
        }

        if source.on_conflict.is_some() {
            target.on_conflict = source.on_conflict;
        }

        if source.override_existing.is_some() {
            target.override_existing = source.override_existing;
        }

        if source.vacate.is_some() {
            target.vacate = source.vacate;
        }

        if source.trash_dir.is_some() {
            target.trash_dir.clone_from(&source.trash_dir);
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }
    }
}
