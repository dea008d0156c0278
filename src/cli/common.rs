//! Shared CLI types: errors, exit codes and layer source resolution.

use crate::bindings::default_layers;
use crate::config::Config;
use crate::models::LayerKeyMap;
use crate::parser;
use std::path::{Path, PathBuf};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was read but is invalid
    ValidationError = 1,
    /// A file could not be read or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should terminate with
    pub exit_code: ExitCode,
    /// Human-readable message
    pub message: String,
}

impl CliError {
    /// Invalid input (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// File system failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::IoError,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Where a layer tree came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// The built-in bindings
    BuiltIn,
    /// A layer file
    File(PathBuf),
}

impl std::fmt::Display for LayerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuiltIn => write!(f, "built-in bindings"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the layer tree from `--layers`, the configured file, or the built-in bindings.
pub fn load_layer_source(
    layers: Option<&Path>,
    config: &Config,
) -> CliResult<(LayerKeyMap, LayerSource)> {
    let path = layers.or(config.paths.layers_file.as_deref());

    let Some(path) = path else {
        return Ok((default_layers(), LayerSource::BuiltIn));
    };

    if !path.exists() {
        return Err(CliError::io(format!(
            "Layer file not found: {}",
            path.display()
        )));
    }

    let tree = parser::load_layers(path)
        .map_err(|e| CliError::validation(format!("Failed to load layers: {e:#}")))?;

    Ok((tree, LayerSource::File(path.to_path_buf())))
}
