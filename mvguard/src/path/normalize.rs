//! Lexical path normalization.
//!
//! Nothing in this module touches the filesystem: symlinks are preserved and
//! paths that do not exist yet normalize like any other. Rename destinations
//! usually do not exist, so this is the only normalization they can get.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand tilde (`~`) to the home directory.
///
/// Handles `~` and `~/path`; `~user` syntax is rejected.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory
/// cannot be determined, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use mvguard::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/Videos")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("Videos"));
///
/// let untouched = expand_tilde(Path::new("Season 1/e01.mkv")).unwrap();
/// assert_eq!(untouched, Path::new("Season 1/e01.mkv"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if let Some(rest) = path_str
        .strip_prefix("~/")
        .or_else(|| path_str.strip_prefix("~\\"))
    {
        Ok(home.join(rest))
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Resolve `.` and `..` components of an absolute path.
///
/// # Errors
///
/// Returns an error if `..` components would escape the root directory.
///
/// # Examples
///
/// ```
/// use mvguard::path::normalize::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// let resolved = resolve_components(Path::new("/media/tv/./show/../movies/a.mkv")).unwrap();
/// assert_eq!(resolved, PathBuf::from("/media/tv/movies/a.mkv"));
///
/// assert!(resolve_components(Path::new("/media/../..")).is_err());
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    let mut has_root = false;

    for component in path.components() {
        match component {
            Component::RootDir => {
                result.push(component);
                has_root = true;
            }
            Component::Prefix(prefix) => {
                result.push(prefix.as_os_str());
                has_root = true;
            }
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "Path contains too many '..' components (escapes root)".to_string(),
                    });
                }
            }
        }
    }

    if has_root && result.as_os_str().is_empty() {
        result.push(Component::RootDir);
    }

    Ok(result)
}

/// Normalize `path` against an explicit base directory.
///
/// Tilde is expanded first; a path that is still relative is joined onto
/// `base`. The result has no `.` or `..` components.
///
/// # Errors
///
/// Returns an error if tilde expansion or component resolution fails, or if
/// the joined path is still not absolute.
///
/// # Examples
///
/// ```
/// use mvguard::path::normalize::normalize_against;
/// use std::path::Path;
///
/// let p = normalize_against(Path::new("/media/incoming"), Path::new("../tv/e01.mkv")).unwrap();
/// assert_eq!(p, Path::new("/media/tv/e01.mkv"));
/// ```
pub fn normalize_against(base: &Path, path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };

    if !absolute.is_absolute() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Base directory {} is not absolute", base.display()),
        });
    }

    resolve_components(&absolute)
}

/// Normalize a path to absolute form, relative to the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or
/// [`normalize_against`] fails.
///
/// # Examples
///
/// ```no_run
/// use mvguard::path::normalize::normalize;
/// use std::path::Path;
///
/// let normalized = normalize(Path::new("./incoming/a.mkv")).unwrap();
/// assert!(normalized.is_absolute());
/// ```
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("Cannot get current directory: {e}"),
    })?;
    normalize_against(&cwd, path)
}
