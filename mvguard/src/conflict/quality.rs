//! Quality ordering of competing rename candidates.
//!
//! When several sources map to one destination, exactly one may keep it.
//! A [`QualityOrder`] ranks the candidates; `Ordering::Less` means the first
//! argument is preferred. Groups are sorted stably, so entries that compare
//! equal keep their batch order.

use std::cmp::Ordering;
use std::fs;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::batch::ResolvedEntry;

/// Total order over candidates, best first.
///
/// Implemented for closures, so a caller can pass a ranking inline:
///
/// ```
/// use mvguard::conflict::QualityOrder;
/// use mvguard::{RenameEntry, ResolvedEntry};
/// use std::cmp::Ordering;
/// use std::path::PathBuf;
///
/// // Prefer sources with longer names.
/// let order = |a: &ResolvedEntry, b: &ResolvedEntry| {
///     let len = |e: &ResolvedEntry| e.source().as_os_str().len();
///     len(b).cmp(&len(a))
/// };
///
/// let short = ResolvedEntry::new(RenameEntry::new("/m/a.avi", "X.avi"), PathBuf::from("/m/X.avi"));
/// let long = ResolvedEntry::new(RenameEntry::new("/m/abc.avi", "X.avi"), PathBuf::from("/m/X.avi"));
/// assert_eq!(order.compare(&long, &short), Ordering::Less);
/// ```
pub trait QualityOrder {
    /// Compare two candidates; `Less` means `a` is preferred over `b`.
    fn compare(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering;
}

impl<F> QualityOrder for F
where
    F: Fn(&ResolvedEntry, &ResolvedEntry) -> Ordering,
{
    fn compare(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering {
        self(a, b)
    }
}

/// Every candidate ranks equal: the first entry in batch order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOrder;

impl QualityOrder for InputOrder {
    fn compare(&self, _a: &ResolvedEntry, _b: &ResolvedEntry) -> Ordering {
        Ordering::Equal
    }
}

/// The larger source file wins. Unreadable sources rank last.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFirst;

impl QualityOrder for LargestFirst {
    fn compare(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering {
        let size = |e: &ResolvedEntry| fs::metadata(e.source()).ok().map(|m| m.len());
        prefer_greater(size(a), size(b))
    }
}

/// The most recently modified source wins. Unreadable sources rank last.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewestFirst;

impl QualityOrder for NewestFirst {
    fn compare(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering {
        let modified = |e: &ResolvedEntry| -> Option<SystemTime> {
            fs::metadata(e.source()).and_then(|m| m.modified()).ok()
        };
        prefer_greater(modified(a), modified(b))
    }
}

fn prefer_greater<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Built-in ranking selectable from configuration or the command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityStrategy {
    /// First listed entry wins.
    #[default]
    Input,
    /// Largest source file wins.
    Largest,
    /// Most recently modified source wins.
    Newest,
}

impl QualityStrategy {
    /// Configuration name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Largest => "largest",
            Self::Newest => "newest",
        }
    }
}

impl std::fmt::Display for QualityStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QualityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(Self::Input),
            "largest" => Ok(Self::Largest),
            "newest" => Ok(Self::Newest),
            other => Err(format!(
                "unknown quality order '{other}' (expected input, largest or newest)"
            )),
        }
    }
}

impl QualityOrder for QualityStrategy {
    fn compare(&self, a: &ResolvedEntry, b: &ResolvedEntry) -> Ordering {
        match self {
            Self::Input => InputOrder.compare(a, b),
            Self::Largest => LargestFirst.compare(a, b),
            Self::Newest => NewestFirst.compare(a, b),
        }
    }
}
