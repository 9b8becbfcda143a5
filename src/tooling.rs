//! Tooling Layer
//!
//! Command-line access to path resolution over a host directory.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
