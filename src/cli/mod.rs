//! CLI command handlers for hyperlayer.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method returning
//! a [`CliResult`]; `main` maps failures to process exit codes.

pub mod common;
pub mod config;
pub mod generate;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use generate::GenerateArgs;
pub use validate::ValidateArgs;
