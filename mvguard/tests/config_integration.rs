//! Integration tests for the configuration system.
//!
//! These tests cover file discovery, merging across sources, environment
//! variable handling and validation working together.
//!
//! Tests that modify environment variables are marked with `#[serial]`;
//! environment variables are process-global, so concurrent access would race.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use mvguard::config::environment::{
    ON_CONFLICT_ENV, OUTPUT_FORMAT_ENV, OVERRIDE_EXISTING_ENV, QUALITY_ORDER_ENV, TRASH_DIR_ENV,
    VACATE_ENV,
};
use mvguard::config::{
    Config, ConfigBuilder, ConfigLoader, ConflictPolicy, OutputFormat, VacateMode,
};
use mvguard::error::Error;
use mvguard::QualityStrategy;

// ============================================================================
// Test Utilities
// ============================================================================

/// Helper to create a temporary config file.
fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

impl EnvGuard {
    fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}

/// Removes every `MVGUARD_*` configuration variable for the guard's lifetime.
fn clean_env() -> Vec<EnvGuard> {
    [
        QUALITY_ORDER_ENV,
        ON_CONFLICT_ENV,
        OVERRIDE_EXISTING_ENV,
        VACATE_ENV,
        TRASH_DIR_ENV,
        OUTPUT_FORMAT_ENV,
    ]
    .iter()
    .map(|key| {
        let guard = EnvGuard {
            key: (*key).to_string(),
            old_value: env::var(key).ok(),
        };
        env::remove_var(key);
        guard
    })
    .collect()
}

/// A data directory plus a nested project directory.
struct Layout {
    _temp: TempDir,
    data_dir: PathBuf,
    project: PathBuf,
    nested: PathBuf,
}

impl Layout {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let project = temp.path().join("media");
        let nested = project.join("tv").join("Show");
        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&nested).unwrap();
        Self {
            _temp: temp,
            data_dir,
            project,
            nested,
        }
    }

    fn builder(&self, working_dir: &Path) -> ConfigBuilder {
        ConfigBuilder::new()
            .with_data_dir(&self.data_dir)
            .with_working_dir(working_dir)
    }
}

// ============================================================================
// File discovery and precedence
// ============================================================================

#[test]
#[serial]
fn test_defaults_without_any_file() {
    let _env = clean_env();
    let layout = Layout::new();

    let config = layout.builder(&layout.nested).build().unwrap();
    assert_eq!(config.quality_order, Some(QualityStrategy::Input));
    assert_eq!(config.on_conflict, Some(ConflictPolicy::Exclude));
    assert_eq!(config.override_existing, Some(false));
    assert_eq!(config.vacate, Some(VacateMode::Trash));
    assert_eq!(config.output_format, Some(OutputFormat::Human));
    assert_eq!(config.trash_dir, Some(layout.data_dir.join("trash")));
}

#[test]
#[serial]
fn test_project_file_found_from_nested_directory() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.yaml", "quality_order: largest\n");

    let config = layout.builder(&layout.nested).build().unwrap();
    assert_eq!(config.quality_order, Some(QualityStrategy::Largest));
}

#[test]
#[serial]
fn test_precedence_user_project_local() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(
        &layout.data_dir,
        "config.yaml",
        "quality_order: newest\non_conflict: abort\noutput_format: json\n",
    );
    create_temp_config(
        &layout.project,
        "mvguard.yaml",
        "on_conflict: exclude\nvacate: delete\n",
    );
    create_temp_config(&layout.project, "mvguard.local.yaml", "vacate: trash\n");

    let config = layout.builder(&layout.project).build().unwrap();
    assert_eq!(config.quality_order, Some(QualityStrategy::Newest));
    assert_eq!(config.on_conflict, Some(ConflictPolicy::Exclude));
    assert_eq!(config.vacate, Some(VacateMode::Trash));
    assert_eq!(config.output_format, Some(OutputFormat::Json));
}

#[test]
#[serial]
fn test_search_stops_at_nearest_project() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.yaml", "quality_order: largest\n");
    create_temp_config(&layout.nested, "mvguard.local.yaml", "output_format: tsv\n");

    let config = layout.builder(&layout.nested).build().unwrap();
    // The outer project file is never reached.
    assert_eq!(config.quality_order, Some(QualityStrategy::Input));
    assert_eq!(config.output_format, Some(OutputFormat::Tsv));
}

#[test]
fn test_loader_reports_sources_in_precedence_order() {
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.local.yaml", "vacate: delete\n");
    create_temp_config(&layout.project, "mvguard.yaml", "vacate: trash\n");
    create_temp_config(&layout.data_dir, "config.yaml", "override_existing: true\n");

    let sources = ConfigLoader::load_all(&layout.project, Some(&layout.data_dir)).unwrap();
    let precedences: Vec<u8> = sources.iter().map(|s| s.precedence).collect();
    assert_eq!(precedences, vec![1, 2, 3]);
    assert!(sources[2].path.ends_with("mvguard.local.yaml"));
}

// ============================================================================
// Environment variables
// ============================================================================

#[test]
#[serial]
fn test_environment_beats_files() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.yaml", "quality_order: largest\n");
    let _quality = EnvGuard::new(QUALITY_ORDER_ENV, "newest");
    let _override = EnvGuard::new(OVERRIDE_EXISTING_ENV, "yes");

    let config = layout.builder(&layout.project).build().unwrap();
    assert_eq!(config.quality_order, Some(QualityStrategy::Newest));
    assert_eq!(config.override_existing, Some(true));
}

#[test]
#[serial]
fn test_programmatic_overrides_beat_environment() {
    let _env = clean_env();
    let layout = Layout::new();
    let _vacate = EnvGuard::new(VACATE_ENV, "delete");

    let config = layout
        .builder(&layout.project)
        .with_config(Config {
            vacate: Some(VacateMode::Trash),
            ..Config::default()
        })
        .build()
        .unwrap();
    assert_eq!(config.vacate, Some(VacateMode::Trash));
}

#[test]
#[serial]
fn test_invalid_environment_value() {
    let _env = clean_env();
    let layout = Layout::new();
    let _policy = EnvGuard::new(ON_CONFLICT_ENV, "ignore");

    let err = layout.builder(&layout.project).build().unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
#[serial]
fn test_skip_env_ignores_variables() {
    let _env = clean_env();
    let layout = Layout::new();
    let _format = EnvGuard::new(OUTPUT_FORMAT_ENV, "json");

    let config = layout
        .builder(&layout.project)
        .skip_env()
        .build()
        .unwrap();
    assert_eq!(config.output_format, Some(OutputFormat::Human));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
#[serial]
fn test_unknown_field_rejected() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.yaml", "quality: largest\n");

    assert!(layout.builder(&layout.project).build().is_err());
}

#[test]
#[serial]
fn test_relative_trash_dir_rejected() {
    let _env = clean_env();
    let layout = Layout::new();
    create_temp_config(&layout.project, "mvguard.yaml", "trash_dir: trash\n");

    let err = layout.builder(&layout.project).build().unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "trash_dir"));
}

#[test]
#[serial]
fn test_configured_trash_dir_kept() {
    let _env = clean_env();
    let layout = Layout::new();
    let _trash = EnvGuard::new(TRASH_DIR_ENV, "~/.Trash");

    let config = layout.builder(&layout.project).build().unwrap();
    assert_eq!(config.trash_dir, Some(PathBuf::from("~/.Trash")));
}
