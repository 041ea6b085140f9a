//! Check command implementation.
//!
//! This module implements the `check` command, which reports every conflict
//! in a rename mapping without touching the filesystem.

use crate::error::CliError;
use crate::utils::{
    build_detector, load_configuration, load_mapping, output_format, print_output, shorten_path,
    GlobalOptions,
};
use clap::Args;
use mvguard::config::OutputFormat;
use mvguard::mapping::InputFormat;
use mvguard::{Config, QualityStrategy, ResolutionSession};
use std::path::PathBuf;

/// Report conflicts in a rename mapping.
#[derive(Args)]
pub struct CheckCommand {
    /// Mapping file (YAML, JSON or TSV)
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    /// Mapping file format (default: guessed from the file extension)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<InputFormat>,

    /// How to rank sources that share a destination
    #[arg(long, value_enum, ignore_case = true)]
    pub quality_order: Option<QualityStrategy>,

    /// Report format
    #[arg(long, value_enum, ignore_case = true)]
    pub output: Option<OutputFormat>,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();

        // 1. Load configuration, flags first
        let config = load_configuration(
            global,
            Config {
                quality_order: self.quality_order,
                output_format: self.output,
                ..Config::default()
            },
        )?;

        // 2. Read the mapping
        let batch = load_mapping(&self.mapping, self.format)?;
        logger.debug(&format!(
            "checking {} entries from {}",
            batch.len(),
            shorten_path(&self.mapping)
        ));

        // 3. Detect
        let detector = build_detector(&config);
        let session = ResolutionSession::start(&detector, batch)?;
        for (entry, err) in session.unresolvable() {
            logger.warn(&format!("skipping {entry}: {err}"));
        }

        // 4. Report
        let formatter = output_format(&config).create_formatter();
        print_output(&formatter.format_conflicts(session.conflicts())?)?;

        let unresolved = session.conflicts().len() + session.unresolvable().len();
        if unresolved > 0 {
            return Err(CliError::SemanticFailure(format!(
                "{unresolved} of {} entries cannot be renamed safely",
                session.original().len()
            )));
        }
        Ok(())
    }
}
