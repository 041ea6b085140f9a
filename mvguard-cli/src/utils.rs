//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, mapping input, collaborator construction
//! and output.

use crate::error::CliError;
use mvguard::config::{OutputFormat, VacateMode};
use mvguard::conflict::{DeleteVacate, TrashVacate};
use mvguard::mapping::{self, InputFormat};
use mvguard::path::normalize::expand_tilde;
use mvguard::{init_logger, Batch, Config, ConfigBuilder, ConflictDetector, Logger, Vacate};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Logger honouring `--verbose`, `--quiet` and `MVGUARD_LOG_MODE`.
    pub fn logger(&self) -> Logger {
        init_logger(self.verbose, self.quiet)
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Command-line flags (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions, flags: Config) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_config(flags);
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Read a mapping file into a batch.
///
/// # Errors
///
/// Returns `InvalidArguments` if the file does not exist.
pub fn load_mapping(path: &Path, format: Option<InputFormat>) -> Result<Batch, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "Mapping file not found: {}",
            path.display()
        )));
    }
    mapping::load(path, format).map_err(CliError::from)
}

/// Detector ranking duplicates by the configured quality order.
pub fn build_detector(config: &Config) -> ConflictDetector {
    ConflictDetector::new().with_quality_order(config.quality_order.unwrap_or_default())
}

/// Vacate strategy selected by the configuration.
pub fn build_vacate(config: &Config) -> Result<Box<dyn Vacate>, CliError> {
    match config.vacate.unwrap_or_default() {
        VacateMode::Delete => Ok(Box::new(DeleteVacate)),
        VacateMode::Trash => {
            let dir = config
                .trash_dir
                .as_deref()
                .ok_or_else(|| CliError::Config("trash_dir is not set".to_string()))?;
            let dir = expand_tilde(dir).map_err(|e| CliError::Config(e.to_string()))?;
            Ok(Box::new(TrashVacate::new(dir)))
        }
    }
}

/// Output format selected by the configuration.
pub fn output_format(config: &Config) -> OutputFormat {
    config.output_format.unwrap_or_default()
}

/// Write `text` to stdout followed by a newline; empty text writes nothing.
pub fn print_output(text: &str) -> Result<(), CliError> {
    if text.is_empty() {
        return Ok(());
    }
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}")?;
    Ok(())
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
