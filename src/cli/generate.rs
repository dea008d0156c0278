//! Generate command for `karabiner.json`.

use crate::cli::common::{load_layer_source, CliError, CliResult};
use crate::config::Config;
use crate::services::DocumentService;
use clap::Args;
use std::path::PathBuf;

/// Compile the layer tree and write a Karabiner configuration
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Layer file (TOML, JSON or YAML); defaults to the configured file or built-in bindings
    #[arg(short, long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Output file (defaults to output.path from the config)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,

    /// Omit the rule that turns the Hyper source key into the modifier chord
    #[arg(long)]
    pub no_hyper_key: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let (layers, source) = load_layer_source(self.layers.as_deref(), config)?;

        let mut config = config.clone();
        if self.no_hyper_key {
            config.hyper.enabled = false;
        }

        let document = DocumentService::build(&layers, &config)
            .map_err(|e| CliError::validation(format!("Layer compilation failed: {e}")))?;

        if self.stdout {
            let content = DocumentService::render(&document)
                .map_err(|e| CliError::io(format!("Failed to render document: {e}")))?;
            print!("{content}");
            return Ok(());
        }

        let out = self.out.clone().unwrap_or_else(|| config.output.path.clone());

        DocumentService::write(&document, &out)
            .map_err(|e| CliError::io(format!("Failed to write {}: {e:#}", out.display())))?;

        let rules = &document.profiles[0].complex_modifications.rules;
        println!("✓ Generated {}", out.display());
        println!("  Source: {source}");
        println!(
            "  Rules: {}, manipulators: {}",
            rules.len(),
            document.manipulator_count()
        );

        Ok(())
    }
}
