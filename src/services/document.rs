//! Karabiner document assembly and file I/O.
//!
//! This module wraps compiled rules in the top-level `karabiner.json`
//! document and writes it to disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::bindings::hyper_key_rule;
use crate::compiler::{CompileError, LayerCompiler};
use crate::config::Config;
use crate::models::{KarabinerDocument, LayerKeyMap};

/// Service for building and writing Karabiner documents.
pub struct DocumentService;

impl DocumentService {
    /// Compiles `layers` and wraps the result in a document.
    ///
    /// The Hyper key rule (when enabled in `config`) comes first, followed by
    /// one rule per top-level key.
    ///
    /// # Returns
    ///
    /// * `Ok(KarabinerDocument)` - Complete document
    /// * `Err(CompileError)` - The tree failed validation; nothing was compiled
    pub fn build(layers: &LayerKeyMap, config: &Config) -> Result<KarabinerDocument, CompileError> {
        let compiler = LayerCompiler::new(config.layer_options());
        let compiled = compiler.compile_rules(layers)?;

        let mut rules = Vec::with_capacity(compiled.len() + 1);
        if config.hyper.enabled {
            rules.push(hyper_key_rule(&config.hyper.from_key, &config.hyper.modifiers));
        }
        rules.extend(compiled);

        Ok(KarabinerDocument::new(
            config.output.profile_name.clone(),
            config.output.show_in_menu_bar,
            rules,
        ))
    }

    /// Serializes a document as pretty-printed JSON with a trailing newline.
    pub fn render(document: &KarabinerDocument) -> Result<String> {
        let mut content =
            serde_json::to_string_pretty(document).context("Failed to serialize Karabiner document")?;
        content.push('\n');
        Ok(content)
    }

    /// Writes a document to `path`.
    ///
    /// This performs an atomic write using a temp file + rename pattern so an
    /// existing configuration is never left half-written.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to write
    /// * `path` - Destination file (parent directories are created)
    pub fn write(document: &KarabinerDocument, path: &Path) -> Result<()> {
        let content = Self::render(document)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "Failed to create output directory: {}",
                parent.display()
            ))?;
        }

        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp file to: {}",
            path.display()
        ))?;

        info!(
            path = %path.display(),
            manipulators = document.manipulator_count(),
            "wrote Karabiner configuration"
        );

        Ok(())
    }

    /// Reads a previously written document.
    pub fn load(path: &Path) -> Result<KarabinerDocument> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read Karabiner file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse Karabiner file: {}", path.display()))
    }
}
