//! Resolve command implementation.
//!
//! This module implements the `resolve` command: detect conflicts, vacate
//! occupied destinations when asked to, then print the part of the mapping
//! that is safe to execute. The conflict report goes to stderr so stdout
//! carries only the mapping.

use crate::error::CliError;
use crate::utils::{
    build_detector, build_vacate, load_configuration, load_mapping, output_format, print_output,
    shorten_path, GlobalOptions,
};
use clap::Args;
use mvguard::config::{ConflictPolicy, OutputFormat, VacateMode};
use mvguard::mapping::InputFormat;
use mvguard::session::Check;
use mvguard::{check, Config, Decision, Outcome, QualityStrategy};
use std::path::PathBuf;

/// Resolve conflicts and print the mapping that is safe to run.
#[derive(Args)]
pub struct ResolveCommand {
    /// Mapping file (YAML, JSON or TSV)
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    /// Mapping file format (default: guessed from the file extension)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<InputFormat>,

    /// Vacate destinations that only block because they already exist
    #[arg(long = "override")]
    pub override_existing: bool,

    /// What to do with conflicts that remain
    #[arg(long, value_enum, ignore_case = true)]
    pub on_conflict: Option<ConflictPolicy>,

    /// How to vacate destinations
    #[arg(long, value_enum, ignore_case = true)]
    pub vacate: Option<VacateMode>,

    /// Directory receiving trashed destinations
    #[arg(long, value_name = "PATH")]
    pub trash_dir: Option<PathBuf>,

    /// How to rank sources that share a destination
    #[arg(long, value_enum, ignore_case = true)]
    pub quality_order: Option<QualityStrategy>,

    /// Mapping output format
    #[arg(long, value_enum, ignore_case = true)]
    pub output: Option<OutputFormat>,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();

        // 1. Load configuration, flags first
        let config = load_configuration(
            global,
            Config {
                quality_order: self.quality_order,
                on_conflict: self.on_conflict,
                override_existing: self.override_existing.then_some(true),
                vacate: self.vacate,
                trash_dir: self.trash_dir,
                output_format: self.output,
            },
        )?;
        let formatter = output_format(&config).create_formatter();

        // 2. Read the mapping and detect
        let batch = load_mapping(&self.mapping, self.format)?;
        let detector = build_detector(&config);
        let mut session = match check(&detector, batch)? {
            Check::Clear(batch) => {
                logger.info(&format!("no conflicts in {} entries", batch.len()));
                return print_output(&formatter.format_batch(&batch)?);
            }
            Check::Conflicts(session) => session,
        };
        for (entry, err) in session.unresolvable() {
            logger.warn(&format!("skipping {entry}: {err}"));
        }

        // 3. Override if requested
        if config.override_existing == Some(true) && session.can_override() {
            let vacate = build_vacate(&config)?;
            if let (Some(VacateMode::Trash), Some(dir)) = (config.vacate, &config.trash_dir) {
                logger.info(&format!("moving occupied destinations to {}", shorten_path(dir)));
            }
            session.override_all(vacate.as_ref())?;
            logger.info(&format!("vacated {} destinations", session.cleared().len()));
        }

        // 4. Report what is left
        if !session.is_resolved() && !logger.is_quiet() {
            let report = OutputFormat::Human
                .create_formatter()
                .format_conflicts(session.conflicts())?;
            eprintln!("{report}");
        }

        // 5. Decide
        let unresolved = session.conflicts().len() + session.unresolvable().len();
        let decision = match config.on_conflict.unwrap_or_default() {
            ConflictPolicy::Abort if unresolved > 0 => Decision::Cancel,
            _ => Decision::Continue,
        };

        match session.finish(decision) {
            Outcome::Execute(executable) => {
                if unresolved > 0 {
                    logger.warn(&format!("excluded {unresolved} entries from the batch"));
                }
                print_output(&formatter.format_batch(&executable)?)
            }
            Outcome::Abort => Err(CliError::SemanticFailure(format!(
                "rename batch aborted: {unresolved} entries cannot be renamed safely"
            ))),
        }
    }
}
