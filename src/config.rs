//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::{
    LayerOptions, DEFAULT_HOLD_TIMEOUT_MS, DEFAULT_TRIGGER_LABEL, DEFAULT_VARIABLE_PREFIX,
};
use crate::constants::{APP_DIR_NAME, CONFIG_DIR_ENV};
use crate::models::ModifierSet;

/// Path configuration for input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Layer file to compile instead of the built-in bindings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers_file: Option<PathBuf>,
}

/// Generated document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `generate` writes the document
    pub path: PathBuf,
    /// Name of the Karabiner profile
    pub profile_name: String,
    /// Show the Karabiner icon in the menu bar
    pub show_in_menu_bar: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("karabiner.json"),
            profile_name: "Default".to_string(),
            show_in_menu_bar: false,
        }
    }
}

/// Layer compilation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Prefix of synthesized state variables
    pub variable_prefix: String,
    /// Milliseconds before an entered layer resets on its own
    pub hold_timeout_ms: u64,
    /// Name of the trigger used in rule descriptions
    pub trigger_label: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            hold_timeout_ms: DEFAULT_HOLD_TIMEOUT_MS,
            trigger_label: DEFAULT_TRIGGER_LABEL.to_string(),
        }
    }
}

/// Hyper key settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperConfig {
    /// Emit the rule that turns `from_key` into the Hyper chord
    pub enabled: bool,
    /// Physical key acting as Hyper
    pub from_key: String,
    /// Modifiers making up the chord; also the trigger for top-level layers
    pub modifiers: ModifierSet,
}

impl Default for HyperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            from_key: "caps_lock".to_string(),
            modifiers: ModifierSet::hyper(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/hyperlayer/config.toml`
/// - macOS: `~/Library/Application Support/hyperlayer/config.toml`
/// - Windows: `%APPDATA%\hyperlayer\config.toml`
///
/// The directory can be overridden with the `HYPERLAYER_CONFIG_DIR`
/// environment variable.
///
/// # Validation
///
/// - `hold_timeout_ms` must be greater than zero
/// - `variable_prefix`, `from_key` and `profile_name` must be non-empty
/// - the Hyper modifier set must be non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Input paths
    pub paths: PathConfig,
    /// Output document settings
    pub output: OutputConfig,
    /// Layer compilation settings
    pub layers: LayerConfig,
    /// Hyper key settings
    pub hyper: HyperConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Uses `HYPERLAYER_CONFIG_DIR` when set, otherwise the platform config
    /// directory joined with `hyperlayer`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.layers.hold_timeout_ms == 0 {
            anyhow::bail!("layers.hold_timeout_ms must be greater than zero");
        }

        if self.layers.variable_prefix.trim().is_empty() {
            anyhow::bail!("layers.variable_prefix must not be empty");
        }

        if self.hyper.from_key.trim().is_empty() {
            anyhow::bail!("hyper.from_key must not be empty");
        }

        if self.hyper.modifiers.is_empty() {
            anyhow::bail!("hyper.modifiers must list at least one modifier");
        }

        if self.output.profile_name.trim().is_empty() {
            anyhow::bail!("output.profile_name must not be empty");
        }

        Ok(())
    }

    /// Compiler options derived from this configuration.
    #[must_use]
    pub fn layer_options(&self) -> LayerOptions {
        LayerOptions {
            trigger: self.hyper.modifiers.clone(),
            variable_prefix: self.layers.variable_prefix.clone(),
            hold_timeout_ms: self.layers.hold_timeout_ms,
            trigger_label: self.layers.trigger_label.clone(),
        }
    }
}
