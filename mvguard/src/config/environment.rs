//! Environment variable handling for configuration overrides.
//!
//! Every configuration field has an `MVGUARD_*` variable that overrides the
//! file-based value.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// `quality_order` override.
pub const QUALITY_ORDER_ENV: &str = "MVGUARD_QUALITY_ORDER";
/// `on_conflict` override.
pub const ON_CONFLICT_ENV: &str = "MVGUARD_ON_CONFLICT";
/// `override_existing` override.
pub const OVERRIDE_EXISTING_ENV: &str = "MVGUARD_OVERRIDE_EXISTING";
/// `vacate` override.
pub const VACATE_ENV: &str = "MVGUARD_VACATE";
/// `trash_dir` override.
pub const TRASH_DIR_ENV: &str = "MVGUARD_TRASH_DIR";
/// `output_format` override.
pub const OUTPUT_FORMAT_ENV: &str = "MVGUARD_OUTPUT_FORMAT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use mvguard::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply `MVGUARD_*` environment variables to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(QUALITY_ORDER_ENV) {
            config.quality_order = Some(Self::parse_enum(QUALITY_ORDER_ENV, &val)?);
        }

        if let Ok(val) = env::var(ON_CONFLICT_ENV) {
            config.on_conflict = Some(Self::parse_enum(ON_CONFLICT_ENV, &val)?);
        }

        if let Ok(val) = env::var(OVERRIDE_EXISTING_ENV) {
            config.override_existing = Some(Self::parse_bool(OVERRIDE_EXISTING_ENV, &val)?);
        }

        if let Ok(val) = env::var(VACATE_ENV) {
            config.vacate = Some(Self::parse_enum(VACATE_ENV, &val)?);
        }

        if let Ok(val) = env::var(TRASH_DIR_ENV) {
            config.trash_dir = Some(PathBuf::from(val));
        }

        if let Ok(val) = env::var(OUTPUT_FORMAT_ENV) {
            config.output_format = Some(Self::parse_enum(OUTPUT_FORMAT_ENV, &val)?);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_enum<T>(field: &str, s: &str) -> Result<T>
    where
        T: FromStr<Err = String>,
    {
        s.trim().parse().map_err(|message| Error::Validation {
            field: field.into(),
            message,
        })
    }
}
