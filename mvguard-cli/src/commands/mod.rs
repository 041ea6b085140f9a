//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `check`: Report conflicts in a rename mapping
//! - `resolve`: Override or exclude conflicts and print the safe mapping
//! - `validate`: Validate configuration file
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod resolve;
pub mod validate;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use resolve::ResolveCommand;
pub use validate::ValidateCommand;
