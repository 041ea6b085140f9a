//! Path handling for rename mappings.
//!
//! Destinations in a rename mapping are often given relative to the source
//! file (`"Show/Season 1/Show - 1x01.mkv"`). Before any conflict check runs,
//! each destination is resolved to an absolute, lexically normalized path by a
//! [`DestinationResolver`]. The default [`PathResolver`] joins relative
//! destinations onto the source's parent directory.
//!
//! Normalization is purely lexical: `.` and `..` are removed and `~` is
//! expanded, but symlinks are never followed and the filesystem is never
//! consulted, since destinations usually do not exist yet.
//!
//! # Examples
//!
//! ```
//! use mvguard::path::{DestinationResolver, PathResolver};
//! use std::path::Path;
//!
//! let resolver = PathResolver::new();
//! let dest = resolver
//!     .resolve(Path::new("/media/in/a.avi"), Path::new("./out/../b.avi"))
//!     .unwrap();
//! assert_eq!(dest, Path::new("/media/in/b.avi"));
//! ```

pub mod normalize;
pub mod resolver;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use normalize::normalize;
pub use resolver::{DestinationResolver, PathResolver};
