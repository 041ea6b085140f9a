//! Configuration validation.
//!
//! Enum-valued fields are already checked by serde. What remains are the
//! free-form path and the combinations of settings that make no sense.

use std::path::{Component, Path};

use crate::config::schema::{Config, VacateMode};
use crate::error::{Error, Result};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use mvguard::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::with_defaults()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref trash_dir) = config.trash_dir {
            Self::validate_trash_dir(trash_dir)?;

            if config.vacate == Some(VacateMode::Delete) {
                log::warn!(
                    "trash_dir {} is ignored because vacate is set to delete",
                    trash_dir.display()
                );
            }
        }

        Ok(())
    }

    fn validate_trash_dir(path: &Path) -> Result<()> {
        let invalid = |message: &str| Error::Validation {
            field: "trash_dir".into(),
            message: message.into(),
        };

        let Some(text) = path.to_str() else {
            return Err(invalid("Path must be valid UTF-8"));
        };
        if text.trim().is_empty() {
            return Err(invalid("Path cannot be empty"));
        }
        if text.contains('\0') {
            return Err(invalid("Path cannot contain null bytes"));
        }
        if !path.is_absolute() && !text.starts_with('~') {
            return Err(invalid("Path must be absolute or start with ~"));
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(invalid("Path cannot contain '..' components"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn with_trash(dir: &str) -> Config {
        Config {
            trash_dir: Some(PathBuf::from(dir)),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_empty_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_trash_dir_absolute() {
        assert!(ConfigValidator::validate(&with_trash("/var/mvguard/trash")).is_ok());
        assert!(ConfigValidator::validate(&with_trash("~/.Trash")).is_ok());
    }

    #[test]
    fn test_validate_trash_dir_relative_rejected() {
        let err = ConfigValidator::validate(&with_trash("trash")).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "trash_dir"));
    }

    #[test]
    fn test_validate_trash_dir_empty_rejected() {
        assert!(ConfigValidator::validate(&with_trash("  ")).is_err());
    }

    #[test]
    fn test_validate_trash_dir_parent_components_rejected() {
        assert!(ConfigValidator::validate(&with_trash("/var/../trash")).is_err());
    }

    #[test]
    fn test_delete_with_trash_dir_is_allowed() {
        let config = Config {
            vacate: Some(VacateMode::Delete),
            ..with_trash("/var/trash")
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
