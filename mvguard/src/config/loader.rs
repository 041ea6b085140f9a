//! Finding and reading configuration files.
//!
//! Three file layers exist. The user file lives in the data directory; the
//! project and local files are searched for from the working directory
//! upwards, and the search ends at the first directory holding either one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "mvguard.yaml";

/// Name of the private, uncommitted project configuration file.
pub const LOCAL_CONFIG_FILE: &str = "mvguard.local.yaml";

const USER_CONFIG_FILE: &str = "config.yaml";

/// The file layers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    User,
    Project,
    Local,
}

impl Layer {
    const fn precedence(self) -> u8 {
        match self {
            Self::User => 1,
            Self::Project => 2,
            Self::Local => 3,
        }
    }

    const fn file_name(self) -> &'static str {
        match self {
            Self::User => USER_CONFIG_FILE,
            Self::Project => PROJECT_CONFIG_FILE,
            Self::Local => LOCAL_CONFIG_FILE,
        }
    }

    fn read(self, dir: &Path) -> Result<Option<ConfigSource>> {
        let path = dir.join(self.file_name());
        if !path.is_file() {
            return Ok(None);
        }
        let config = ConfigLoader::load_file(&path)?;
        Ok(Some(ConfigSource {
            path,
            precedence: self.precedence(),
            config,
        }))
    }
}

/// One configuration file that was found and parsed.
///
/// A source with a higher `precedence` wins over a lower one.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Where the file was read from.
    pub path: PathBuf,
    /// 1 for the user file, 2 for `mvguard.yaml`, 3 for `mvguard.local.yaml`.
    pub precedence: u8,
    /// Parsed contents.
    pub config: Config,
}

/// Reads the configuration files that apply to a working directory.
///
/// # Examples
///
/// ```no_run
/// use mvguard::config::ConfigLoader;
/// use std::path::Path;
///
/// for source in ConfigLoader::load_all(Path::new("/media/tv"), None).unwrap() {
///     println!("{} (precedence {})", source.path.display(), source.precedence);
/// }
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Every configuration file for `working_dir`, weakest first.
    ///
    /// The user file is read from `data_dir`, or `~/.mvguard` when `None`.
    ///
    /// # Errors
    ///
    /// Fails if a file is present but unreadable or malformed, or if no data
    /// directory is given and the home directory is unknown.
    pub fn load_all(working_dir: &Path, data_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir()?,
        };

        let mut sources: Vec<ConfigSource> = Layer::User.read(&data_dir)?.into_iter().collect();
        sources.extend(Self::discover_project_configs(working_dir)?);
        sources.sort_by_key(|s| s.precedence);

        for source in &sources {
            log::debug!("using configuration {}", source.path.display());
        }
        Ok(sources)
    }

    /// Project and local files of the nearest directory, at or above
    /// `start_dir`, that has either of them.
    ///
    /// # Errors
    ///
    /// Fails if a found file is unreadable or malformed.
    pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<ConfigSource>> {
        for dir in start_dir.ancestors() {
            let found: Vec<ConfigSource> = [Layer::Project, Layer::Local]
                .into_iter()
                .filter_map(|layer| layer.read(dir).transpose())
                .collect::<Result<_>>()?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }

    /// Parse one YAML configuration file.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] if the file cannot be read and
    /// [`Error::Validation`] naming the file if its contents are not a valid
    /// configuration.
    pub fn load_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot read configuration: {e}"),
        })?;

        serde_yaml::from_str(&text).map_err(|e| Error::Validation {
            field: path.display().to_string(),
            message: format!("invalid configuration: {e}"),
        })
    }
}

/// `~/.mvguard`, the data directory used when none is configured.
///
/// # Errors
///
/// Fails if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".mvguard"))
        .ok_or_else(|| Error::Validation {
            field: "data_dir".into(),
            message: "home directory is unknown; pass a data directory".into(),
        })
}
