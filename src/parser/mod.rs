//! Layer file parsing.
//!
//! Layer trees can be written in TOML, JSON or YAML. The format is
//! chosen from the file extension. In every format a table with a `to` key
//! is a leaf and any other table is a nested layer:
//!
//! ```toml
//! [h]
//! to = [{ key_code = "left_arrow" }]
//!
//! [o.c]
//! description = "Open Chrome"
//! to = [{ shell_command = "open -a 'Google Chrome.app'" }]
//! ```
//!
//! YAML keys that look like numbers (`3:`) must be quoted.

use crate::models::layer::LayerKeyMap;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Supported layer file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl LayerFormat {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unsupported layer file extension '{}' for {} (expected .toml, .json, .yaml or .yml)",
                ext,
                path.display()
            ),
        }
    }
}

impl std::fmt::Display for LayerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// Parses a layer tree from `content` in the given format.
pub fn parse_layers(content: &str, format: LayerFormat) -> Result<LayerKeyMap> {
    let layers = match format {
        LayerFormat::Toml => toml::from_str(content).context("Failed to parse TOML layer file")?,
        LayerFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON layer file")?
        }
        LayerFormat::Yaml => {
            serde_yml::from_str(content).context("Failed to parse YAML layer file")?
        }
    };
    Ok(layers)
}

/// Loads a layer tree from a file.
pub fn load_layers(path: &Path) -> Result<LayerKeyMap> {
    let format = LayerFormat::from_path(path)?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layer file: {}", path.display()))?;

    let layers = parse_layers(&content, format)
        .with_context(|| format!("Invalid layer file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        %format,
        bindings = layers.len(),
        "loaded layer file"
    );

    Ok(layers)
}
