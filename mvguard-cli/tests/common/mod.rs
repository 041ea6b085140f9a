//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers with an isolated data directory
//! - Mapping file fixtures

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test.
const MVGUARD_ENV: [&str; 8] = [
    "MVGUARD_DATA_DIR",
    "MVGUARD_LOG_MODE",
    "MVGUARD_QUALITY_ORDER",
    "MVGUARD_ON_CONFLICT",
    "MVGUARD_OVERRIDE_EXISTING",
    "MVGUARD_VACATE",
    "MVGUARD_TRASH_DIR",
    "MVGUARD_OUTPUT_FORMAT",
];

/// Test environment with isolated data and media directories.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the mvguard data directory
    pub data_dir: PathBuf,
    /// Directory holding the files being renamed
    pub media: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with an empty media directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("mvguard-data");
        let media = temp_dir.path().join("media");
        fs::create_dir_all(&media).expect("Failed to create media directory");

        Self {
            temp_dir,
            data_dir,
            media,
        }
    }

    /// Get a bare command builder running inside the media directory.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("mvguard").expect("Failed to find mvguard binary");
        cmd.current_dir(&self.media);
        for key in MVGUARD_ENV {
            cmd.env_remove(key);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Absolute path of `name` inside the media directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.media.join(name)
    }

    /// Create a file in the media directory.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Write a TSV mapping of `(source name, destination)` pairs.
    ///
    /// Sources are written as absolute paths inside the media directory.
    pub fn tsv_mapping(&self, pairs: &[(&str, &str)]) -> PathBuf {
        let contents: String = pairs
            .iter()
            .map(|(source, destination)| {
                format!("{}\t{destination}\n", self.path(source).display())
            })
            .collect();
        self.write_mapping("renames.tsv", &contents)
    }

    /// Write an arbitrary mapping file next to the media directory.
    pub fn write_mapping(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write mapping");
        path
    }

    /// Write a configuration file.
    pub fn write_config(&self, dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Entries currently in the trash directory.
    pub fn trashed(&self) -> Vec<PathBuf> {
        match fs::read_dir(self.data_dir.join("trash")) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
